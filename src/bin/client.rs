use clap::Parser;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Простой GET-клиент для проверки сервера
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct ClientConfig {
    /// Хост сервера
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Порт сервера
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Запрашиваемый путь
    #[arg(short, long, default_value = "/index.html")]
    target: String,
}

fn main() -> io::Result<()> {
    let config = ClientConfig::parse();

    let addr = (config.host.as_str(), config.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "host did not resolve"))?;

    let mut stream = TcpStream::connect_timeout(&addr, Duration::from_secs(5))?;
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    // HTTP/1.0: the server closes after one response, so read_to_end
    // terminates.
    stream.write_all(format!("GET {} HTTP/1.0\r\n", config.target).as_bytes())?;
    stream.flush()?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;
    io::stdout().write_all(&response)?;

    Ok(())
}
