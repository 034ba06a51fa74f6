//! Transport events.

/// An event delivered by the chat transport.
///
/// The transport (long-polling loop, webhook, test harness) owns command
/// parsing and file downloads; the service only ever sees these three
/// shapes. The namespace is the end user's identity and scopes everything
/// the event touches.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    /// The user uploaded a document.
    DocumentUploaded {
        /// The uploading user's namespace.
        namespace: String,
        /// The raw file bytes.
        data: Vec<u8>,
        /// The uploaded filename, used as the document's source id.
        filename: String,
    },
    /// The user asked a question.
    QuestionAsked {
        /// The asking user's namespace.
        namespace: String,
        /// The question text.
        text: String,
    },
    /// The user asked to erase their stored data.
    ResetRequested {
        /// The namespace to erase.
        namespace: String,
    },
}
