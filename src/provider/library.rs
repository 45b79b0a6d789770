use crate::book::{shape, Book};
use crate::config;
use crate::provider::ClientError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 라이브러리 서버 클라이언트
///
/// 베이스 URL은 생성 시점에 한번만 파싱한다. 모든 응답은 상태 코드 확인,
/// 본문 추출, JSON 파싱, 형태 검증을 순서대로 통과해야 반환 된다.
#[derive(Debug)]
pub struct Client {
    base_url: reqwest::Url,
    http: reqwest::Client,
    timeout: Duration,
}

impl Client {
    pub fn new(api: &config::Api) -> Result<Self, ClientError> {
        let mut base = api.base_url().to_owned();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = reqwest::Url::parse(&base).map_err(|_| ClientError::InvalidBaseUrl)?;
        let timeout = Duration::from_secs(api.timeout_secs().unwrap_or(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        self.base_url.join(path).map_err(|_| ClientError::InvalidBaseUrl)
    }

    /// 응답의 상태 코드를 확인하고 본문을 JSON으로 디코딩한다.
    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ClientError> {
        let response = response
            .error_for_status()
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::ResponseTextExtractionFailed(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| ClientError::ResponseParseFailed(e.to_string()))
    }
}

#[async_trait]
impl crate::provider::Client for Client {
    async fn get_books(&self) -> Result<Vec<Book>, ClientError> {
        let url = self.url("library")?;
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let value = self.read_json(response).await?;
        shape::assert_books(&value)?;

        to_typed(value)
    }

    async fn add_book(&self, candidate: &Book) -> Result<Book, ClientError> {
        let url = self.url("library/")?;
        let response = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(candidate)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let value = self.read_json(response).await?;
        shape::assert_book(&value)?;

        merge_book(candidate, &value)
    }

    async fn get_book(&self, id: i32) -> Result<Book, ClientError> {
        let url = self.url(&format!("library/{}", id))?;
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let value = self.read_json(response).await?;
        shape::assert_book(&value)?;

        to_typed(value)
    }

    async fn update_book(&self, id: i32, book: &Book) -> Result<Book, ClientError> {
        let url = self.url(&format!("library/{}", id))?;
        let response = self
            .http
            .put(url)
            .timeout(self.timeout)
            .json(book)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let value = self.read_json(response).await?;
        shape::assert_book(&value)?;

        to_typed(value)
    }

    async fn delete_book(&self, id: i32) -> Result<(), ClientError> {
        let url = self.url(&format!("library/{}", id))?;
        let response = self
            .http
            .delete(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;
        Ok(())
    }
}

/// 형태 검증을 통과한 JSON 값을 도서 타입으로 변환한다.
fn to_typed<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::ResponseParseFailed(e.to_string()))
}

/// 전달한 도서와 서버 응답을 병합한다.
///
/// 서버는 `id` 같은 필드를 새로 할당하거나 정규화 할 수 있음으로
/// 키가 겹칠 경우 서버 응답의 값을 우선한다.
fn merge_book(candidate: &Book, overlay: &Value) -> Result<Book, ClientError> {
    let mut merged = serde_json::to_value(candidate)
        .map_err(|e| ClientError::ResponseParseFailed(e.to_string()))?;

    if let (Some(base), Some(overlay)) = (merged.as_object_mut(), overlay.as_object()) {
        for (key, value) in overlay {
            base.insert(key.clone(), value.clone());
        }
    }

    to_typed(merged)
}
