use library_client_rust::library::PageState;
use library_client_rust::{config, create_library_page};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    config::load_dotenv();
    let config = config::load_config()
        .unwrap_or_else(|e| panic!("Cannot loading config: {}", e));
    let _logging_guard = config::log::set_global_logging_config(config.logger());

    let page = create_library_page(&config)
        .expect("Failed to create library client");

    page.load().await;
    match page.state() {
        PageState::Ready(books) => {
            info!("{}권의 도서를 조회 하였습니다.", books.len());
            for book in &books {
                println!("{}", book.title);
                println!("  {}", book.author);
            }
        }
        PageState::Failed(e) => {
            error!("도서 목록을 가져오지 못했습니다. => {:?}", e);
        }
        PageState::Loading => {}
    }

    page.teardown();
}
