//! Output stream lifecycle.
//!
//! Sinks (recorder, floating preview) hold a reference to the published
//! stream for the whole session, so the handle must be created exactly
//! once and reused on every subsequent publish. This adapter owns that
//! lifecycle so the render loop only has to say "publish".

/// Lazily creates the output stream on first publish and hands back the
/// same handle on every publish after that.
pub struct StreamPublisher<T> {
    factory: Box<dyn FnMut() -> T + Send>,
    stream: Option<T>,
    publishes: u64,
}

impl<T> StreamPublisher<T> {
    pub fn new(factory: impl FnMut() -> T + Send + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            stream: None,
            publishes: 0,
        }
    }

    /// Publish the current surface contents: creates the stream on the
    /// first call, reuses it afterwards. Returns the live handle.
    pub fn publish(&mut self) -> &T {
        self.publishes += 1;
        if self.stream.is_none() {
            tracing::info!("Creating output stream");
        }
        let factory = &mut self.factory;
        self.stream.get_or_insert_with(|| factory())
    }

    /// Whether the stream handle exists yet.
    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// The live handle, if any, without publishing.
    pub fn stream(&self) -> Option<&T> {
        self.stream.as_ref()
    }

    /// How many times the surface has been published.
    pub fn publishes(&self) -> u64 {
        self.publishes
    }

    /// Tear the stream down, handing the handle back to the caller.
    pub fn shutdown(&mut self) -> Option<T> {
        self.publishes = 0;
        self.stream.take()
    }
}
