use crate::book::Book;
use crate::provider::{Client, ClientError};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;
use tracing::{debug, error};

/// 라이브러리 페이지 상태
///
/// 최초 로드가 끝나면 `Loading`에서 `Ready` 혹은 `Failed`로 전이 되고
/// 이후에는 저장 성공 시 `Ready`의 목록만 갱신 된다.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// 최초 로드가 완료 되지 않음
    Loading,

    /// 도서 목록 표시 가능 (최신 등록순)
    Ready(Vec<Book>),

    /// 최초 로드 실패 재시도 가능
    Failed(ClientError),
}

/// 페이지 조작 중 발생하는 에러 열거
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// 이미 진행 중인 저장이 있음
    SaveInFlight,

    /// 클라이언트에서 전달된 에러
    Client(ClientError),
}

impl Display for PageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PageError::SaveInFlight => write!(f, "Save already in flight"),
            PageError::Client(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PageError {}

struct Inner {
    state: PageState,
    mounted: bool,
    saving: bool,

    /// 로드 결과 적용 가드로 로드 도중 상태가 갱신 되면 (teardown, 저장 완료)
    /// 값이 증가하여 뒤늦게 도착한 로드 결과가 버려진다.
    epoch: u64,
}

/// 라이브러리 페이지 뷰 모델
///
/// 도서 목록을 소유하는 유일한 주체로 모든 상태 전이는
/// 짧은 락 획득 한 번으로 처리 된다.
pub struct LibraryPage<C> {
    client: C,
    inner: Mutex<Inner>,
}

impl<C: Client> LibraryPage<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                state: PageState::Loading,
                mounted: true,
                saving: false,
                epoch: 0,
            }),
        }
    }

    /// 도서 목록을 로드한다.
    ///
    /// 로드가 진행 되는 동안 페이지가 내려가거나 저장이 먼저 완료 되었다면
    /// 결과는 상태에 적용하지 않고 버린다.
    pub async fn load(&self) {
        let epoch = self.inner.lock().unwrap().epoch;

        let result = self.client.get_books().await;

        let mut inner = self.inner.lock().unwrap();
        if !inner.mounted || inner.epoch != epoch {
            debug!("페이지가 내려갔거나 상태가 먼저 갱신 되어 로드 결과를 버립니다.");
            return;
        }

        match result {
            Ok(books) => inner.state = PageState::Ready(books),
            Err(e) => {
                error!("도서 목록 로드에 실패 하였습니다. => {:?}", e);
                inner.state = PageState::Failed(e);
            }
        }
    }

    /// 새 도서를 저장하고 성공 시 목록 맨 앞에 추가한다.
    ///
    /// 이미 진행 중인 저장이 있으면 클라이언트 호출 없이 바로 실패하며,
    /// 저장에 실패 하면 목록은 시도 이전 그대로 유지 된다.
    pub async fn save(&self, candidate: Book) -> Result<Book, PageError> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.saving {
                return Err(PageError::SaveInFlight);
            }
            inner.saving = true;
        }

        let result = self.client.add_book(&candidate).await;

        let mut inner = self.inner.lock().unwrap();
        inner.saving = false;

        match result {
            Ok(book) => {
                if inner.mounted {
                    match &mut inner.state {
                        PageState::Ready(books) => books.insert(0, book.clone()),
                        // 최초 로드보다 저장이 먼저 완료된 경우로, 아직 전송 중인
                        // 로드 결과가 이 도서를 덮어쓰지 않아야 한다.
                        _ => inner.state = PageState::Ready(vec![book.clone()]),
                    }
                    inner.epoch += 1;
                }
                Ok(book)
            }
            Err(e) => {
                error!("도서 저장에 실패 하였습니다. => {:?} (ID: {})", e, candidate.id);
                Err(PageError::Client(e))
            }
        }
    }

    /// 페이지를 내린다.
    ///
    /// 진행 중인 최초 로드는 결과가 버려지는 것으로 취소 되고,
    /// 이미 전송된 저장 요청은 끝까지 실행 되지만 상태를 변경하지 않는다.
    pub fn teardown(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.mounted = false;
        inner.epoch += 1;
    }

    pub fn state(&self) -> PageState {
        self.inner.lock().unwrap().state.clone()
    }

    pub fn is_saving(&self) -> bool {
        self.inner.lock().unwrap().saving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MockClient {
        get_result: Mutex<Option<Result<Vec<Book>, ClientError>>>,
        add_result: Mutex<Option<Result<Book, ClientError>>>,

        /// 설정 시 응답 반환 전에 notify를 기다린다.
        get_gate: Option<Arc<Notify>>,
        add_gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl Client for MockClient {
        async fn get_books(&self) -> Result<Vec<Book>, ClientError> {
            if let Some(gate) = &self.get_gate {
                gate.notified().await;
            }
            self.get_result.lock().unwrap().take().unwrap()
        }

        async fn add_book(&self, _candidate: &Book) -> Result<Book, ClientError> {
            if let Some(gate) = &self.add_gate {
                gate.notified().await;
            }
            self.add_result.lock().unwrap().take().unwrap()
        }

        async fn get_book(&self, _id: i32) -> Result<Book, ClientError> {
            unimplemented!()
        }

        async fn update_book(&self, _id: i32, _book: &Book) -> Result<Book, ClientError> {
            unimplemented!()
        }

        async fn delete_book(&self, _id: i32) -> Result<(), ClientError> {
            unimplemented!()
        }
    }

    fn mock_with_books(books: Vec<Book>) -> MockClient {
        MockClient {
            get_result: Mutex::new(Some(Ok(books))),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn load_transitions_to_ready() {
        let page = LibraryPage::new(mock_with_books(vec![Book::new(1, "t", "a")]));

        assert_eq!(page.state(), PageState::Loading);
        page.load().await;

        assert_eq!(page.state(), PageState::Ready(vec![Book::new(1, "t", "a")]));
    }

    #[tokio::test]
    async fn load_failure_transitions_to_failed() {
        let client = MockClient {
            get_result: Mutex::new(Some(Err(ClientError::RequestFailed("refused".to_owned())))),
            ..Default::default()
        };
        let page = LibraryPage::new(client);

        page.load().await;

        assert_eq!(
            page.state(),
            PageState::Failed(ClientError::RequestFailed("refused".to_owned()))
        );
    }

    #[tokio::test]
    async fn save_prepends_newest_first() {
        let client = MockClient {
            get_result: Mutex::new(Some(Ok(vec![Book::new(1, "t1", "a1")]))),
            add_result: Mutex::new(Some(Ok(Book::new(2, "t2", "a2")))),
            ..Default::default()
        };
        let page = LibraryPage::new(client);

        page.load().await;
        let saved = page.save(Book::new(2, "t2", "a2")).await.unwrap();

        assert_eq!(saved, Book::new(2, "t2", "a2"));
        assert_eq!(
            page.state(),
            PageState::Ready(vec![Book::new(2, "t2", "a2"), Book::new(1, "t1", "a1")])
        );
    }

    #[tokio::test]
    async fn save_failure_keeps_list_untouched() {
        let client = MockClient {
            get_result: Mutex::new(Some(Ok(vec![Book::new(1, "t1", "a1")]))),
            add_result: Mutex::new(Some(Err(ClientError::RequestFailed("refused".to_owned())))),
            ..Default::default()
        };
        let page = LibraryPage::new(client);

        page.load().await;
        let error = page.save(Book::new(2, "t2", "a2")).await.unwrap_err();

        assert_eq!(
            error,
            PageError::Client(ClientError::RequestFailed("refused".to_owned()))
        );
        assert_eq!(page.state(), PageState::Ready(vec![Book::new(1, "t1", "a1")]));
    }

    #[tokio::test]
    async fn teardown_discards_pending_load_result() {
        let gate = Arc::new(Notify::new());
        let client = MockClient {
            get_result: Mutex::new(Some(Ok(vec![Book::new(1, "t", "a")]))),
            get_gate: Some(Arc::clone(&gate)),
            ..Default::default()
        };
        let page = Arc::new(LibraryPage::new(client));

        let pending = tokio::spawn({
            let page = Arc::clone(&page);
            async move { page.load().await }
        });
        tokio::task::yield_now().await;

        page.teardown();
        gate.notify_one();
        pending.await.unwrap();

        assert_eq!(page.state(), PageState::Loading);
    }

    #[tokio::test]
    async fn late_load_result_does_not_clobber_landed_save() {
        let gate = Arc::new(Notify::new());
        let client = MockClient {
            get_result: Mutex::new(Some(Ok(vec![Book::new(1, "t1", "a1")]))),
            get_gate: Some(Arc::clone(&gate)),
            add_result: Mutex::new(Some(Ok(Book::new(2, "t2", "a2")))),
            ..Default::default()
        };
        let page = Arc::new(LibraryPage::new(client));

        let pending = tokio::spawn({
            let page = Arc::clone(&page);
            async move { page.load().await }
        });
        tokio::task::yield_now().await;

        page.save(Book::new(2, "t2", "a2")).await.unwrap();
        assert_eq!(page.state(), PageState::Ready(vec![Book::new(2, "t2", "a2")]));

        gate.notify_one();
        pending.await.unwrap();

        assert_eq!(page.state(), PageState::Ready(vec![Book::new(2, "t2", "a2")]));
    }

    #[tokio::test]
    async fn concurrent_save_is_rejected() {
        let gate = Arc::new(Notify::new());
        let client = MockClient {
            add_result: Mutex::new(Some(Ok(Book::new(1, "t", "a")))),
            add_gate: Some(Arc::clone(&gate)),
            ..Default::default()
        };
        let page = Arc::new(LibraryPage::new(client));

        let pending = tokio::spawn({
            let page = Arc::clone(&page);
            async move { page.save(Book::new(1, "t", "a")).await }
        });
        tokio::task::yield_now().await;
        assert!(page.is_saving());

        let error = page.save(Book::new(1, "t", "a")).await.unwrap_err();
        assert_eq!(error, PageError::SaveInFlight);

        gate.notify_one();
        pending.await.unwrap().unwrap();
        assert!(!page.is_saving());
    }

    #[tokio::test]
    async fn save_after_teardown_returns_book_without_touching_state() {
        let client = MockClient {
            get_result: Mutex::new(Some(Ok(vec![Book::new(1, "t1", "a1")]))),
            add_result: Mutex::new(Some(Ok(Book::new(2, "t2", "a2")))),
            ..Default::default()
        };
        let page = LibraryPage::new(client);

        page.load().await;
        page.teardown();

        let saved = page.save(Book::new(2, "t2", "a2")).await.unwrap();

        assert_eq!(saved, Book::new(2, "t2", "a2"));
        assert_eq!(page.state(), PageState::Ready(vec![Book::new(1, "t1", "a1")]));
    }
}
