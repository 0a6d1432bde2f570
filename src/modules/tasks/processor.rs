// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::journal::DeliveryJournal;
use crate::modules::smtp::transport::Transport;
use crate::modules::tasks::attachment::remove_staging;
use crate::modules::tasks::store::TaskStore;
use crate::modules::tasks::worker::{SendJob, Worker};
use crate::raise_error;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{error, warn};

pub enum Package {
    PoisonPill,
    Job(Box<SendJob>),
}

impl Package {
    pub fn job(job: SendJob) -> Self {
        Package::Job(Box::new(job))
    }
}

/// Hands accepted jobs to background workers, at most `limit` at a time.
pub struct SendQueue {
    channel: mpsc::Sender<Package>,
}

impl SendQueue {
    pub fn new<T, S, J>(worker: Worker<T, S, J>, limit: usize) -> Self
    where
        T: Transport,
        S: TaskStore,
        J: DeliveryJournal,
    {
        let (sender, mut receiver) = mpsc::channel::<Package>(200);
        let semaphore = Arc::new(Semaphore::new(limit.max(1)));

        tokio::spawn(async move {
            let mut jobs_in_progress: Vec<JoinHandle<()>> = Vec::new();

            while let Some(package) = receiver.recv().await {
                match package {
                    Package::PoisonPill => {
                        warn!(
                            "Received process exit signal, {} send jobs still in progress.",
                            jobs_in_progress.len()
                        );
                        for handle in jobs_in_progress {
                            if let Err(e) = handle.await {
                                error!("Send job execution failed: {:?}", e);
                            }
                        }
                        break;
                    }
                    Package::Job(job) => {
                        let permit = match semaphore.clone().acquire_owned().await {
                            Ok(permit) => permit,
                            Err(e) => {
                                error!("Send queue semaphore closed: {:?}", e);
                                break;
                            }
                        };
                        jobs_in_progress.retain(|handle| !handle.is_finished());
                        jobs_in_progress.push(Self::spawn_job(*job, permit, worker.clone()));
                    }
                }
            }
        });

        SendQueue { channel: sender }
    }

    pub async fn submit(&self, job: SendJob) -> CampaignResult<()> {
        self.channel.send(Package::job(job)).await.map_err(|e| {
            raise_error!(
                format!("Send queue is not accepting jobs: {}", e),
                ErrorCode::InternalError
            )
        })
    }

    /// Stops accepting jobs once in-flight ones finish.
    pub async fn shutdown(&self) {
        if let Err(e) = self.channel.send(Package::PoisonPill).await {
            error!("Failed to stop send queue. Channel error: {:?}", e);
        }
    }

    fn spawn_job<T, S, J>(
        job: SendJob,
        permit: OwnedSemaphorePermit,
        worker: Worker<T, S, J>,
    ) -> JoinHandle<()>
    where
        T: Transport,
        S: TaskStore,
        J: DeliveryJournal,
    {
        tokio::spawn(async move {
            let _permit = permit;
            let task_id = job.task_id.clone();
            let staging_dir = job.staging_dir.clone();
            let store = worker.store().clone();

            // A nested task turns a worker panic into a JoinError we can record.
            let outcome = tokio::spawn(async move { worker.run(&job).await }).await;
            let trace = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(format!("{:?}", e)),
                Err(e) => Some(format!("Worker aborted: {:?}", e)),
            };
            if let Some(trace) = trace {
                error!("Task {} failed: {}", task_id, trace);
                if let Err(e) = store.fail(&task_id, trace).await {
                    error!("Failed to mark task {} as failed: {:?}", task_id, e);
                }
            }

            if let Some(dir) = staging_dir {
                remove_staging(&dir).await;
            }
        })
    }
}
