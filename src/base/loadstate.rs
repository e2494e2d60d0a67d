/// The lifecycle phase of a WebRequest.
///
/// Variants are declared in lifecycle order so that `<` comparisons read
/// like the transitions: a request only moves forward, `Cancelled` is
/// always followed by `Finished`, and `Deleted` is set on drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LoadState {
    /// Built but not started. Upload bytes may still be appended.
    #[default]
    Created,

    /// `start` was called; waiting for redirects, auth or the response.
    Started,

    /// Response metadata has been delivered to the client.
    Response,

    /// At least one body chunk has been delivered.
    GotData,

    /// The owner thread cancelled the request.
    Cancelled,

    /// A terminal notification was posted and all resources released.
    Finished,

    /// The request was dropped.
    Deleted,
}

impl LoadState {
    /// Whether the request is between `start` and `finish`.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            LoadState::Started | LoadState::Response | LoadState::GotData
        )
    }

    /// Whether the body read loop may run in this state.
    pub fn is_reading(self) -> bool {
        matches!(self, LoadState::Response | LoadState::GotData)
    }
}
