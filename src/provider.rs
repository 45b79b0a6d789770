pub mod library;

use crate::book::{Book, ShapeError};
use async_trait::async_trait;
use std::fmt;
use std::fmt::{Display, Formatter};

/// API 클라이언트에서 사용할 에러 열거
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// 설정된 베이스 URL이 유효하지 않음
    InvalidBaseUrl,

    /// 요청 전송 실패 (연결 거부, 타임아웃, 2xx 이외의 상태 코드)
    RequestFailed(String),

    /// 응답 본문을 읽지 못함
    ResponseTextExtractionFailed(String),

    /// 응답 본문이 유효한 JSON이 아니거나 도서 타입으로 변환하지 못함
    ResponseParseFailed(String),

    /// 응답이 도서 형태와 일치하지 않음
    InvalidResponseShape(ShapeError),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidBaseUrl => write!(f, "Invalid base url"),
            ClientError::RequestFailed(message) => write!(f, "Request failed, {}", message),
            ClientError::ResponseTextExtractionFailed(message) => {
                write!(f, "Response text extraction failed, {}", message)
            }
            ClientError::ResponseParseFailed(message) => {
                write!(f, "Response parse failed, {}", message)
            }
            ClientError::InvalidResponseShape(shape) => {
                write!(f, "Invalid response shape, {}", shape)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ShapeError> for ClientError {
    fn from(shape: ShapeError) -> Self {
        ClientError::InvalidResponseShape(shape)
    }
}

/// 라이브러리 서버 클라이언트 트레이트
///
/// 모든 응답은 JSON으로 디코딩 된 후 도서 형태 검증을 통과해야 반환 된다.
/// 발생한 에러는 복구하지 않고 호출자에게 그대로 전달한다.
#[async_trait]
pub trait Client {
    /// 라이브러리의 모든 도서를 조회한다.
    async fn get_books(&self) -> Result<Vec<Book>, ClientError>;

    /// 새 도서를 등록한다.
    ///
    /// 반환 값은 전달한 도서와 서버 응답의 병합으로,
    /// 키가 겹칠 경우 서버가 내려준 값을 우선한다.
    async fn add_book(&self, candidate: &Book) -> Result<Book, ClientError>;

    /// 아이디로 도서 한 권을 조회한다.
    async fn get_book(&self, id: i32) -> Result<Book, ClientError>;

    /// 저장된 도서를 수정하고 서버에 반영된 도서를 반환한다.
    async fn update_book(&self, id: i32, book: &Book) -> Result<Book, ClientError>;

    /// 저장된 도서를 삭제한다.
    async fn delete_book(&self, id: i32) -> Result<(), ClientError>;
}
