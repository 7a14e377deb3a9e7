//! Stop requests from SIGINT/SIGTERM.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;

/// Install the stop handler and return the flag it sets.
///
/// The first signal only sets the flag: the file being worked on is
/// finished and no new encoder is started. A second signal exits at once
/// with status 130.
///
/// External tools run in their own process group, so an encoder that is
/// running when the process exits is not signalled and keeps going on its
/// own. Its original is already safe in `.original/`, but the target it
/// was writing may be left behind partial and has to be removed by hand.
pub fn install_stop_handler() -> std::io::Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let flag = Arc::clone(&stop);
    std::thread::Builder::new()
        .name("vidprep-signals".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                loop {
                    stop_signal().await;
                    if flag.swap(true, Ordering::SeqCst) {
                        tracing::warn!(
                            "Second stop signal received, exiting; a running encoder may leave a partial output"
                        );
                        std::process::exit(130);
                    }
                    tracing::warn!(
                        "Stop requested, finishing the current file (signal again to exit now)"
                    );
                }
            })
        })?;

    Ok(stop)
}

async fn stop_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
