// Binary entry point for redscan
// This is a thin wrapper that delegates to the library implementation

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = redscan_server::shell::run().await {
        eprintln!("redscan fatal error: {:#}", e);
        return Err(e);
    }
    Ok(())
}
