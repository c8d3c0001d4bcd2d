// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign engine for callcast.
//!
//! Registers tenants with their assistants and phone numbers, loads contact
//! lists, creates campaigns from them, and dispatches one outbound call per
//! contact through a [`callcast_core::CallProvider`] in paced batches.

pub mod campaign;
pub mod contacts;
pub mod directory;
pub mod dispatch;

pub use campaign::create_campaign;
pub use contacts::{ContactList, ContactRow, PHONE_HEADER_ALIASES, is_phone_header};
pub use directory::{register_assistant, register_phone_number, register_tenant};
pub use dispatch::{DispatchSettings, Dispatcher};
