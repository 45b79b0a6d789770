pub mod log;

use config;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    api: Api,
    logger: log::Config,
}

impl AppConfig {
    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn logger(&self) -> &log::Config {
        &self.logger
    }
}

/// 라이브러리 서버 접속 설정
#[derive(Debug, Deserialize)]
pub struct Api {
    base_url: String,

    /// 요청 타임아웃 (초) 설정하지 않을 시 클라이언트의 기본값을 사용한다.
    timeout_secs: Option<u64>,
}

impl Api {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    let config = config::Config::builder()
        .add_source(config::File::with_name(&format!("config/{}.json", env)))
        .build()?;

    config.try_deserialize()
}
