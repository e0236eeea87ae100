// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the request pipeline and its collaborators.

pub mod transport;

pub use transport::Transport;
