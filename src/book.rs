pub mod shape;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// 응답 데이터가 도서 형태와 일치하지 않을 때 사용할 에러 열거
///
/// 검증 순서에 따라 처음으로 위반된 항목이 에러로 반환 된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// 값이 오브젝트가 아님 (null 포함)
    NotAnObject,

    /// 값이 배열이 아님
    NotAnArray,

    /// 필수 프로퍼티가 누락됨
    MissingField(&'static str),

    /// 프로퍼티의 타입이 일치하지 않음
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::NotAnObject => write!(f, "Response isn't an object"),
            ShapeError::NotAnArray => write!(f, "Response isn't an array"),
            ShapeError::MissingField(field) => write!(f, "Book doesn't contain {}", field),
            ShapeError::InvalidFieldType { field, expected } => {
                write!(f, "{} is not {}", field, expected)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// 도서
///
/// 서버와 주고 받는 도서 데이터로 `id`는 서버에서 정규화 될 수 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,

    /// 도서 등록 시간 서버가 설정하지 않을 수 있다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_time: Option<chrono::NaiveDateTime>,
}

impl Book {
    pub fn new(id: i32, title: &str, author: &str) -> Self {
        Self {
            id,
            title: title.to_owned(),
            author: author.to_owned(),
            posted_time: None,
        }
    }

    pub fn posted_time(mut self, posted_time: chrono::NaiveDateTime) -> Self {
        self.posted_time = Some(posted_time);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_without_posted_time_omits_field() {
        let book = Book::new(1, "t", "a");
        let value = serde_json::to_value(&book).unwrap();

        assert!(value.get("posted_time").is_none());
    }

    #[test]
    fn deserialize_accepts_missing_posted_time() {
        let book: Book = serde_json::from_str(r#"{"id":1,"title":"t","author":"a"}"#).unwrap();

        assert_eq!(book, Book::new(1, "t", "a"));
    }
}
