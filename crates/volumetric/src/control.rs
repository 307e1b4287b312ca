//! # Control Channel
//!
//! The inbound side of the engine: parameter updates, scene selection and
//! session saves arrive here from whatever transport sits in front of the
//! display.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │  Transport  │─────>│  Control    │─────>│ Frame Loop  │
//! │ (any thread)│      │  Channel    │      │ (one owner) │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! Any number of senders, one consumer. The frame loop drains the queue
//! once at the start of every frame, so every message takes effect on
//! the next frame boundary and never mid-frame.

use std::collections::BTreeMap;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use volumetric_scenes::ParamValue;

use crate::error::ControlError;

/// A message from the control surface.
///
/// JSON form: `{"type": "set_parameters", "values": {"size": 1.5}}`,
/// `{"type": "select_scene", "scene": "cafeWall"}`,
/// `{"type": "save_session"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Live updates for the active scene.
    SetParameters {
        /// Parameter name to new value.
        values: BTreeMap<String, ParamValue>,
    },
    /// Make another scene active.
    SelectScene {
        /// Scene identifier, e.g. `"cafeWall"`.
        scene: String,
    },
    /// Snapshot the active scene's values into session memory.
    SaveSession,
}

impl ControlMessage {
    /// Shorthand for a single parameter update.
    #[must_use]
    pub fn set(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self::SetParameters {
            values: BTreeMap::from([(name.into(), value.into())]),
        }
    }

    /// Shorthand for a scene selection.
    #[must_use]
    pub fn select(scene: impl Into<String>) -> Self {
        Self::SelectScene { scene: scene.into() }
    }

    /// Decodes a JSON control message.
    ///
    /// An object without a `type` field is read as a flat name-to-value
    /// map, i.e. a `SetParameters` message.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Malformed`] if the payload is not JSON or
    /// matches no message shape.
    pub fn decode(json: &str) -> Result<Self, ControlError> {
        let value: Value = serde_json::from_str(json)?;
        let tagged = value.as_object().is_some_and(|object| object.contains_key("type"));
        if tagged {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(Self::SetParameters {
                values: serde_json::from_value(value)?,
            })
        }
    }

    /// Encodes the message in its tagged JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Malformed`] if a value cannot be encoded
    /// (a non-finite number).
    pub fn encode(&self) -> Result<String, ControlError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Bounded control channel.
///
/// Capacity is fixed at creation so a flood of control input cannot grow
/// memory; excess messages are refused at the sender.
pub struct ControlBus {
    sender: Sender<ControlMessage>,
    receiver: Receiver<ControlMessage>,
}

impl ControlBus {
    /// Creates a new control bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Messages that may queue between two drains.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> ControlSender {
        ControlSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates the receiver handle.
    #[must_use]
    pub fn receiver(&self) -> ControlReceiver {
        ControlReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a connected sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (ControlSender, ControlReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending control messages.
#[derive(Clone)]
pub struct ControlSender {
    sender: Sender<ControlMessage>,
}

impl ControlSender {
    /// Queues a message (non-blocking).
    ///
    /// Returns `false` if the queue is full or the frame loop is gone;
    /// the message is dropped.
    #[inline]
    pub fn send(&self, message: ControlMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }

    /// Queues a message, waiting for room if the queue is full.
    ///
    /// Returns `false` only if the frame loop is gone.
    #[inline]
    pub fn send_blocking(&self, message: ControlMessage) -> bool {
        self.sender.send(message).is_ok()
    }

    /// Decodes a JSON message and queues it.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Malformed`] if the payload does not decode.
    pub fn send_json(&self, json: &str) -> Result<bool, ControlError> {
        Ok(self.send(ControlMessage::decode(json)?))
    }
}

/// Handle for receiving control messages.
#[derive(Clone)]
pub struct ControlReceiver {
    receiver: Receiver<ControlMessage>,
}

impl ControlReceiver {
    /// Takes every queued message, oldest first (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<ControlMessage> {
        let mut messages = Vec::with_capacity(self.receiver.len());
        while let Ok(message) = self.receiver.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// Takes one message (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<ControlMessage> {
        self.receiver.try_recv().ok()
    }

    /// Number of queued messages.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Whether anything is queued.
    #[inline]
    #[must_use]
    pub fn has_messages(&self) -> bool {
        !self.receiver.is_empty()
    }
}
