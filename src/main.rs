use clap::Parser;
use fileserv::logger;
use fileserv::server::HttpServer;
use fileserv::server::config::ServerConfig;
use log::info;

fn main() -> std::io::Result<()> {
    logger::init();

    let config = ServerConfig::parse();
    info!("Starting static HTTP server with config: {:?}", config);

    let server = HttpServer::new(&config)?;
    server.run();

    Ok(())
}
