//! # Run Loop
//!
//! Pulls controller events one at a time and hands them to the dispatcher
//! until the operator interrupts or the controller goes away. The motors are
//! released on the way out, whichever way the loop ends.

use std::future::Future;
use tracing::{error, info, warn};

use crate::actuator::Actuator;
use crate::audio::Audio;
use crate::controller::EventSource;
use crate::dispatcher::MotionDispatcher;
use crate::error::Result;

/// Runs the control loop until `interrupt` completes or `source` fails
///
/// Events are handled strictly in delivery order. A failed motor or sound
/// command is logged and the loop keeps going; a failed read ends it.
///
/// # Errors
///
/// Returns the read error that ended the loop, or otherwise the first error
/// raised while stopping the motors.
pub async fn run<E, A, S, F>(
    source: &mut E,
    dispatcher: &mut MotionDispatcher<A, S>,
    interrupt: F,
) -> Result<()>
where
    E: EventSource,
    A: Actuator,
    S: Audio,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    let outcome = loop {
        tokio::select! {
            biased;

            _ = &mut interrupt => {
                info!("Program interrupted, stopping motors...");
                break Ok(());
            }

            event = source.next_event() => match event {
                Ok(event) => {
                    if let Err(e) = dispatcher.dispatch(&event) {
                        warn!("Failed to handle {:?}: {}", event, e);
                    }
                }
                Err(e) => {
                    error!("Controller stopped delivering events: {}", e);
                    break Err(e);
                }
            }
        }
    };

    let stopped = dispatcher.shutdown();
    if let Err(e) = &stopped {
        error!("Failed to stop motors: {}", e);
    }

    outcome.and(stopped)
}
