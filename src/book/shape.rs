use crate::book::ShapeError;
use serde_json::Value;

/// 디코딩된 JSON 값이 도서 형태인지 검증한다.
///
/// 검증은 아래 순서로 진행 되며 처음으로 위반된 항목이 에러로 반환 된다.
/// 1. 값이 오브젝트인지
/// 2. `id` 존재 여부 / `id`가 정수인지
/// 3. `title` 존재 여부 / `title`이 문자열인지
/// 4. `author` 존재 여부 / `author`가 문자열인지
///
/// `posted_time`은 선택 프로퍼티로 검증하지 않는다.
pub fn assert_book(value: &Value) -> Result<(), ShapeError> {
    let object = value.as_object().ok_or(ShapeError::NotAnObject)?;

    let id = object.get("id").ok_or(ShapeError::MissingField("id"))?;
    if !id.is_i64() {
        return Err(ShapeError::InvalidFieldType {
            field: "id",
            expected: "a number",
        });
    }

    let title = object.get("title").ok_or(ShapeError::MissingField("title"))?;
    if !title.is_string() {
        return Err(ShapeError::InvalidFieldType {
            field: "title",
            expected: "a string",
        });
    }

    let author = object.get("author").ok_or(ShapeError::MissingField("author"))?;
    if !author.is_string() {
        return Err(ShapeError::InvalidFieldType {
            field: "author",
            expected: "a string",
        });
    }

    Ok(())
}

/// 디코딩된 JSON 값이 도서 목록 형태인지 검증한다.
///
/// 빈 배열은 요소 검사 없이 유효한 것으로 판단하며,
/// 요소 검증은 처음으로 실패한 요소에서 중단 된다.
pub fn assert_books(value: &Value) -> Result<(), ShapeError> {
    let items = value.as_array().ok_or(ShapeError::NotAnArray)?;
    if items.is_empty() {
        return Ok(());
    }

    for item in items {
        assert_book(item)?;
    }
    Ok(())
}
