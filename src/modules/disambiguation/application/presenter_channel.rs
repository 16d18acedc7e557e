use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::modules::disambiguation::domain::{Choice, ChoiceOption, DisambiguationPresenter};
use crate::{log_debug, log_info, log_warn};

enum PresenterRequest {
    ChooseOne {
        query: String,
        options: Vec<ChoiceOption>,
        reply: oneshot::Sender<Option<Choice>>,
    },
    PromptFreeText {
        suggestion: String,
        reply: oneshot::Sender<Option<String>>,
    },
}

/// Cloneable sender side used by matching workers
///
/// Every request waits for its own reply. A closed channel answers `None`,
/// which callers treat as a cancelled prompt.
#[derive(Clone)]
pub struct PresenterHandle {
    sender: mpsc::Sender<PresenterRequest>,
}

impl PresenterHandle {
    /// A handle with nobody listening: every prompt is answered with `None`
    pub fn detached() -> Self {
        let (sender, _) = mpsc::channel(1);
        Self { sender }
    }

    pub fn is_interactive(&self) -> bool {
        !self.sender.is_closed()
    }

    pub async fn choose_one(&self, query: &str, options: Vec<ChoiceOption>) -> Option<Choice> {
        let (reply, response) = oneshot::channel();
        let request = PresenterRequest::ChooseOne {
            query: query.to_string(),
            options,
            reply,
        };

        if self.sender.send(request).await.is_err() {
            log_debug!("Presenter unavailable, choice for '{}' cancelled", query);
            return None;
        }
        response.await.ok().flatten()
    }

    pub async fn prompt_free_text(&self, suggestion: &str) -> Option<String> {
        let (reply, response) = oneshot::channel();
        let request = PresenterRequest::PromptFreeText {
            suggestion: suggestion.to_string(),
            reply,
        };

        if self.sender.send(request).await.is_err() {
            log_debug!("Presenter unavailable, query prompt for '{}' cancelled", suggestion);
            return None;
        }
        response.await.ok().flatten()
    }
}

/// Single consumer that feeds requests to a presenter one at a time
pub struct PresenterChannel {
    receiver: mpsc::Receiver<PresenterRequest>,
}

impl PresenterChannel {
    pub fn new(buffer: usize) -> (PresenterHandle, PresenterChannel) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (PresenterHandle { sender }, PresenterChannel { receiver })
    }

    /// Serves requests until every handle is dropped, returns the number served
    pub async fn serve<P: DisambiguationPresenter + ?Sized>(mut self, presenter: &mut P) -> usize {
        log_info!("Presenter channel started");
        let mut served = 0;

        while let Some(request) = self.receiver.recv().await {
            served += 1;
            match request {
                PresenterRequest::ChooseOne {
                    query,
                    options,
                    reply,
                } => {
                    let choice = presenter.choose_one(&query, &options).await;
                    if reply.send(choice).is_err() {
                        log_warn!("Choice for '{}' arrived after the requester gave up", query);
                    }
                }
                PresenterRequest::PromptFreeText { suggestion, reply } => {
                    let text = presenter.prompt_free_text(&suggestion).await;
                    if reply.send(text).is_err() {
                        log_warn!("Query for '{}' arrived after the requester gave up", suggestion);
                    }
                }
            }
        }

        log_info!("Presenter channel closed after {} requests", served);
        served
    }

    /// Runs the consumer on its own task and hands the presenter back when done
    pub fn spawn<P>(self, mut presenter: P) -> JoinHandle<P>
    where
        P: DisambiguationPresenter + 'static,
    {
        tokio::spawn(async move {
            self.serve(&mut presenter).await;
            presenter
        })
    }
}
