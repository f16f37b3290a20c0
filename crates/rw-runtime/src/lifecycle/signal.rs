use tokio_util::sync::CancellationToken;

/// Cancel `cancel` on the first SIGINT or SIGTERM.
pub async fn wait_for_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        rw_info!(sys, signal = "SIGINT", "received signal, stopping feed");
                    }
                    _ = sigterm.recv() => {
                        rw_info!(sys, signal = "SIGTERM", "received signal, stopping feed");
                    }
                    _ = cancel.cancelled() => return,
                }
            }
            Err(e) => {
                rw_warn!(sys, error = %e, "SIGTERM handler unavailable, listening for Ctrl-C only");
                wait_for_ctrl_c(&cancel).await;
            }
        }
    }
    #[cfg(not(unix))]
    wait_for_ctrl_c(&cancel).await;

    cancel.cancel();
}

async fn wait_for_ctrl_c(cancel: &CancellationToken) {
    tokio::select! {
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => rw_info!(sys, signal = "SIGINT", "received signal, stopping feed"),
            Err(e) => {
                rw_error!(sys, error = %e, "Ctrl-C handler unavailable");
                cancel.cancelled().await;
            }
        },
        _ = cancel.cancelled() => {}
    }
}
