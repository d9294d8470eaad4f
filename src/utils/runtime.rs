use anyhow::Result;

/// Everything onelist does is sequential, so a single thread is all the runtime ever needs.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
