//! The studio session: form input, the two request flows, and the view state.
//!
//! ```no_run
//! use image_studio::{HttpImageApi, ImageSize, Studio};
//!
//! #[tokio::main]
//! async fn main() -> image_studio::Result<()> {
//!     let studio = Studio::new(HttpImageApi::builder().build());
//!
//!     studio.set_generate_prompt("A watercolor lighthouse on a stormy coast");
//!     studio.set_size(ImageSize::Landscape);
//!     studio.submit_generate().await?;
//!
//!     studio.set_edit_prompt("Add stars in the night sky");
//!     let edited = studio.submit_edit().await?;
//!     edited.save("edited.png").await?;
//!     Ok(())
//! }
//! ```

mod state;

pub use state::{StatusLine, StudioState};

use crate::api::ImageApi;
use crate::error::{Flow, Result, StudioError};
use crate::image::{DataUri, ImageFile, ImageSize, ImageSource};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const GENERATED_STATUS: &str = "Image generated! You can now edit it on the right.";
const EDITED_STATUS: &str = "Image edited successfully.";
const UPLOADED_STATUS: &str = "Using uploaded image for editing.";
const USE_GENERATED_STATUS: &str = "Using generated image for editing.";

/// A studio session.
///
/// Cloning yields another handle to the same session, so a generation and
/// an edit can be driven from separate tasks. The state lock is never held
/// across a network call.
pub struct Studio<A> {
    api: Arc<A>,
    state: Arc<Mutex<StudioState>>,
}

impl<A> Clone for Studio<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: ImageApi> Studio<A> {
    /// Creates an empty session backed by `api`.
    pub fn new(api: A) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(Mutex::new(StudioState::default())),
        }
    }

    /// The API this session talks to.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Returns a copy of the current view state.
    pub fn snapshot(&self) -> StudioState {
        self.lock().clone()
    }

    /// Sets the generation prompt.
    pub fn set_generate_prompt(&self, prompt: impl Into<String>) {
        self.lock().generate_prompt = prompt.into();
    }

    /// Sets the generation size.
    pub fn set_size(&self, size: ImageSize) {
        self.lock().size = size;
    }

    /// Sets the edit prompt.
    pub fn set_edit_prompt(&self, prompt: impl Into<String>) {
        self.lock().edit_prompt = prompt.into();
    }

    /// Makes `file` the base image for the next edit.
    pub fn select_upload(&self, file: ImageFile) {
        tracing::debug!(file = %file.name, size = file.size(), "upload selected");
        let mut state = self.lock();
        state.reset_status();
        state.base_image = ImageSource::uploaded(file);
        state.status_line = StatusLine::Status(UPLOADED_STATUS.into());
    }

    /// Switches the base image back to the generated image, dropping any
    /// upload. Returns false when nothing has been generated yet.
    pub fn use_generated_for_editing(&self) -> bool {
        let mut state = self.lock();
        let Some(generated) = state.generated_image.clone() else {
            return false;
        };
        state.base_image = ImageSource::Generated(generated);
        state.status_line = StatusLine::Status(USE_GENERATED_STATUS.into());
        true
    }

    /// Submits the generation form.
    ///
    /// On success the returned image is both the generated image and the new
    /// base image. Every outcome is also reflected in the status line.
    ///
    /// The status line is cleared first. A submit rejected with
    /// [`StudioError::Busy`] leaves it cleared and touches nothing else.
    pub async fn submit_generate(&self) -> Result<DataUri> {
        let (prompt, size, busy) = {
            let mut state = self.lock();
            state.reset_status();
            if state.generating {
                return Err(StudioError::Busy(Flow::Generate));
            }
            if state.generate_prompt.trim().is_empty() {
                let error = StudioError::EmptyPrompt(Flow::Generate);
                return Err(fail(&mut state, Flow::Generate, error));
            }
            let busy = BusyGuard::engage(&self.state, &mut state, Flow::Generate);
            (state.generate_prompt.clone(), state.size, busy)
        };

        let result = self.api.generate(&prompt, size).await;

        let outcome = {
            let mut state = self.lock();
            match result {
                Ok(payload) => {
                    let image = DataUri::png(payload);
                    state.generated_image = Some(image.clone());
                    state.base_image = ImageSource::Generated(image.clone());
                    state.status_line = StatusLine::Status(GENERATED_STATUS.into());
                    tracing::info!(%size, payload_len = image.payload().len(), "image generated");
                    Ok(image)
                }
                Err(e) => Err(fail(&mut state, Flow::Generate, e)),
            }
        };
        drop(busy);
        outcome
    }

    /// Submits the edit form.
    ///
    /// The image sent is the uploaded file if there is one, otherwise the
    /// current base image. The result only ever lands in `edited_image`.
    /// Status handling matches [`Studio::submit_generate`].
    pub async fn submit_edit(&self) -> Result<DataUri> {
        let (prompt, file, busy) = {
            let mut state = self.lock();
            state.reset_status();
            if state.editing {
                return Err(StudioError::Busy(Flow::Edit));
            }
            if state.edit_prompt.trim().is_empty() {
                let error = StudioError::EmptyPrompt(Flow::Edit);
                return Err(fail(&mut state, Flow::Edit, error));
            }
            let file = match state.base_image.resolve() {
                Ok(Some(file)) => file,
                Ok(None) => return Err(fail(&mut state, Flow::Edit, StudioError::NoImage)),
                Err(e) => return Err(fail(&mut state, Flow::Edit, e)),
            };
            let busy = BusyGuard::engage(&self.state, &mut state, Flow::Edit);
            (state.edit_prompt.clone(), file, busy)
        };

        let result = self.api.edit(&prompt, &file).await;

        let outcome = {
            let mut state = self.lock();
            match result {
                Ok(payload) => {
                    let image = DataUri::png(payload);
                    state.edited_image = Some(image.clone());
                    state.status_line = StatusLine::Status(EDITED_STATUS.into());
                    tracing::info!(
                        file = %file.name,
                        payload_len = image.payload().len(),
                        "image edited"
                    );
                    Ok(image)
                }
                Err(e) => Err(fail(&mut state, Flow::Edit, e)),
            }
        };
        drop(busy);
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, StudioState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<StudioState>) -> MutexGuard<'_, StudioState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Records `error` in the status line and hands it back.
fn fail(state: &mut StudioState, flow: Flow, error: StudioError) -> StudioError {
    if error.is_local() {
        tracing::debug!(%flow, "rejected locally: {error}");
    } else {
        tracing::warn!(%flow, "request failed: {error}");
    }
    state.status_line = StatusLine::Error(error.user_message(flow));
    error
}

/// Holds a flow's busy flag for as long as it lives.
///
/// Dropping the guard clears the flag, including when the request future is
/// dropped before completing.
struct BusyGuard {
    state: Arc<Mutex<StudioState>>,
    flow: Flow,
}

impl BusyGuard {
    fn engage(shared: &Arc<Mutex<StudioState>>, state: &mut StudioState, flow: Flow) -> Self {
        *busy_flag(state, flow) = true;
        Self {
            state: Arc::clone(shared),
            flow,
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        *busy_flag(&mut state, self.flow) = false;
    }
}

fn busy_flag(state: &mut StudioState, flow: Flow) -> &mut bool {
    match flow {
        Flow::Generate => &mut state.generating,
        Flow::Edit => &mut state.editing,
    }
}
