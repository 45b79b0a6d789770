use crate::provider::ClientError;

pub mod book;
pub mod config;
pub mod library;
pub mod provider;

/// 설정으로 라이브러리 클라이언트와 페이지를 생성한다.
pub fn create_library_page(
    config: &config::AppConfig,
) -> Result<library::LibraryPage<provider::library::Client>, ClientError> {
    let client = provider::library::Client::new(config.api())?;
    Ok(library::LibraryPage::new(client))
}
