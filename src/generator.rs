use std::{any::Any, pin::Pin, sync::Arc, task::{Context, Poll}};

use futures::StreamExt;
use log::{debug, trace, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{sync::mpsc::{self, Receiver, Sender}, task};
use tokio_stream::Stream;

use crate::{
    crossword::{CrosswordData, CrosswordError},
    dictionary::Dictionary,
    generate,
    settings::GeneratorSettings,
    strategy::Algorithm,
    utils::{Progress, ProgressReporter},
    word::WordEntry,
};

/// Error type for the [worker](GenerationWorker)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkerError
{
    #[error("The worker does not accept requests any more.")]
    Closed,
    #[error("The worker stopped before answering request {0}.")]
    Disconnected(u64),
    #[error("Request {id} failed: {message}")]
    Failed { id: u64, message: String },
}

/// Represents a request sent to the worker.
///
/// # Example
/// ```
/// # use crossword_engine::{generator::GenerationRequest, strategy::Algorithm};
/// let request: GenerationRequest = serde_json::from_str(r#"{"type":"generate","id":1,"words":[],"algorithm":"fillin"}"#).unwrap();
/// assert_eq!(request, GenerationRequest::Generate { id: 1, words: vec![], algorithm: Algorithm::Fillin });
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationRequest
{
    /// `words` is ignored by [Algorithm::Fillin] and may be left out.
    Generate
    {
        id: u64,
        #[serde(default)]
        words: Vec<WordEntry>,
        algorithm: Algorithm,
    },
}

impl GenerationRequest
{
    pub fn id(&self) -> u64
    {
        match self
        {
            GenerationRequest::Generate { id, .. } => *id,
        }
    }
}

/// Represents a message sent back by the worker.
///
/// Every request gets zero or more [Progress](WorkerMessage::Progress) messages and then exactly
/// one [Result](WorkerMessage::Result) or [Error](WorkerMessage::Error), all carrying its id.
///
/// # Example
/// ```
/// # use crossword_engine::generator::WorkerMessage;
/// let msg = WorkerMessage::Error { id: 3, message: "boom".to_owned() };
/// assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"type":"error","id":3,"message":"boom"}"#);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerMessage
{
    Progress { id: u64, message: String, percent: u8 },
    Result { id: u64, data: CrosswordData },
    Error { id: u64, message: String },
}

impl WorkerMessage
{
    pub fn id(&self) -> u64
    {
        match self
        {
            WorkerMessage::Progress { id, .. } | WorkerMessage::Result { id, .. } | WorkerMessage::Error { id, .. } => *id,
        }
    }

    /// True for the last message of a request.
    pub fn is_terminal(&self) -> bool
    {
        !matches!(self, WorkerMessage::Progress { .. })
    }
}

/// Represents a background generation queue, runs in an async runtime.
///
/// Requests are executed one at a time in submission order on tokio's blocking pool, the
/// messages they produce are read from the worker as a [Stream].
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use crossword_engine::{dictionary::Dictionary, generator::GenerationWorker, settings::GeneratorSettings, strategy::Algorithm, word::WordEntry};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main()
/// {
///     let settings = GeneratorSettings { seed: Some(1), ..Default::default() };
///     let mut worker = GenerationWorker::spawn(Arc::new(Dictionary::default()), settings);
///
///     let words = ["hello", "world", "low"].iter().map(|w| WordEntry::new(w, "")).collect();
///     let id = worker.submit(words, Algorithm::Original).await.unwrap();
///     let cw = worker.wait_for(id).await.unwrap();
///
///     assert!(cw.words.iter().any(|w| w.word == "HELLO"));
/// }
/// ```
pub struct GenerationWorker
{
    request_sender: Sender<GenerationRequest>,
    message_receiver: Receiver<WorkerMessage>,
    next_id: u64,
}

impl GenerationWorker
{
    /// Starts the worker task. Has to be called inside a tokio runtime.
    pub fn spawn(dict: Arc<Dictionary>, settings: GeneratorSettings) -> GenerationWorker
    {
        let (rs, rr) = mpsc::channel(100);
        let (ms, mr) = mpsc::channel(100);

        task::spawn(serve(rr, ms, dict, Arc::new(settings)));

        GenerationWorker { request_sender: rs, message_receiver: mr, next_id: 1 }
    }

    /// Queues a puzzle built with `algorithm`, returns the request id.
    pub async fn submit(&mut self, words: Vec<WordEntry>, algorithm: Algorithm) -> Result<u64, WorkerError>
    {
        let id = self.next_id;
        self.next_id += 1;

        self.request_sender.send(GenerationRequest::Generate { id, words, algorithm }).await.map_err(|_| WorkerError::Closed)?;
        Ok(id)
    }

    /// Queues a fill-in puzzle, returns the request id.
    pub async fn submit_fillin(&mut self) -> Result<u64, WorkerError>
    {
        self.submit(vec![], Algorithm::Fillin).await
    }

    /// Reads messages until request `id` finishes, dropping everything sent for other requests.
    pub async fn wait_for(&mut self, id: u64) -> Result<CrosswordData, WorkerError>
    {
        while let Some(message) = self.next().await
        {
            match message
            {
                WorkerMessage::Result { id: done, data } if done == id => return Ok(data),
                WorkerMessage::Error { id: failed, message } if failed == id => return Err(WorkerError::Failed { id, message }),
                other => trace!("skipping message for request {}", other.id()),
            }
        }

        Err(WorkerError::Disconnected(id))
    }
}

impl Stream for GenerationWorker
{
    type Item = WorkerMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>>
    {
        self.message_receiver.poll_recv(cx)
    }
}

async fn serve(mut requests: Receiver<GenerationRequest>, messages: Sender<WorkerMessage>, dict: Arc<Dictionary>, settings: Arc<GeneratorSettings>)
{
    while let Some(request) = requests.recv().await
    {
        let id = request.id();
        debug!("worker: request {} started", id);

        let (job_messages, job_dict, job_settings) = (messages.clone(), dict.clone(), settings.clone());
        let outcome = task::spawn_blocking(move || run_job(request, &job_dict, &job_settings, &job_messages)).await;

        let message = match outcome
        {
            Ok(Ok(data)) => WorkerMessage::Result { id, data },
            Ok(Err(err)) => WorkerMessage::Error { id, message: err.to_string() },
            Err(err) if err.is_panic() => WorkerMessage::Error { id, message: panic_message(err.into_panic()) },
            Err(err) => WorkerMessage::Error { id, message: err.to_string() },
        };
        if let WorkerMessage::Error { message, .. } = &message
        {
            warn!("worker: request {} failed: {}", id, message);
        }

        if messages.send(message).await.is_err()
        {
            debug!("worker: nobody is listening any more, stopping");
            break;
        }
    }
}

fn run_job(request: GenerationRequest, dict: &Dictionary, settings: &GeneratorSettings, messages: &Sender<WorkerMessage>) -> Result<CrosswordData, CrosswordError>
{
    let GenerationRequest::Generate { id, words, algorithm } = request;
    let mut rng = match settings.seed
    {
        Some(seed) => StdRng::seed_from_u64(seed ^ id),
        None => StdRng::from_entropy(),
    };

    let mut callback = |p: Progress|
    {
        // progress is advisory, a closed channel only means nobody reads it
        let _ = messages.blocking_send(WorkerMessage::Progress { id, message: p.message, percent: p.percent });
    };
    let mut progress = ProgressReporter::new(&mut callback);

    let data = generate(&words, algorithm, dict, settings, &mut rng, &mut progress);

    data.validate()?;
    Ok(data)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String
{
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "generation panicked".to_owned())
}
