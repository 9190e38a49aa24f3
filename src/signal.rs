use futures::{Stream, StreamExt};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignalTo {
    /// Signal to shutdown process.
    Shutdown,
    /// Shutdown process immediately.
    Quit,
}

/// Signals from OS/user.
///
/// Every delivery of a signal is yielded, so a second interrupt during a
/// graceful shutdown can be observed.
#[cfg(unix)]
pub fn signals() -> std::io::Result<impl Stream<Item = SignalTo> + Send> {
    use tokio::signal::unix::{signal, SignalKind};
    use tokio_stream::wrappers::SignalStream;

    let stream = |kind: SignalKind, to: SignalTo| -> std::io::Result<_> {
        Ok(SignalStream::new(signal(kind)?).map(move |()| to))
    };

    let sigint = stream(SignalKind::interrupt(), SignalTo::Shutdown)?;
    let sigterm = stream(SignalKind::terminate(), SignalTo::Shutdown)?;
    let sigquit = stream(SignalKind::quit(), SignalTo::Quit)?;

    Ok(futures::stream::select(
        futures::stream::select(sigint, sigterm),
        sigquit,
    ))
}

/// Signals from OS/user.
#[cfg(windows)]
pub fn signals() -> std::io::Result<impl Stream<Item = SignalTo> + Send> {
    use tokio_stream::wrappers::CtrlCStream;

    Ok(CtrlCStream::new(tokio::signal::windows::ctrl_c()?).map(|()| SignalTo::Shutdown))
}
