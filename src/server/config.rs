use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Хост сервера
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Порт сервера
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Количество рабочих потоков в пуле потоков
    #[arg(short, long, default_value_t = 10)]
    pub threads: usize,

    /// Корневая директория с документами
    #[arg(short, long, default_value = "./static")]
    pub document_root: PathBuf,

    /// Документ по умолчанию, отдаваемый при запросе "/"
    #[arg(long, default_value = "index.html")]
    pub default_document: String,

    /// Максимальное количество одновременных соединений
    #[arg(long, default_value_t = 1000)]
    pub max_connections: usize,

    /// Базовый таймаут чтения, мс
    #[arg(long, default_value_t = 200_000)]
    pub base_timeout_ms: u64,

    /// Уменьшение таймаута за каждое открытое соединение, мс
    #[arg(long, default_value_t = 10_000)]
    pub timeout_penalty_ms: u64,

    /// Минимальный таймаут чтения, мс
    #[arg(long, default_value_t = 1_000)]
    pub min_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            threads: 10,
            document_root: PathBuf::from("./static"),
            default_document: "index.html".to_string(),
            max_connections: 1000,
            base_timeout_ms: 200_000,
            timeout_penalty_ms: 10_000,
            min_timeout_ms: 1_000,
        }
    }
}
