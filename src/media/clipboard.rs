// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::{self, Write};

use crate::error::MediaError;

/// Destination for copied transcript text
pub trait Clipboard {
    fn set_text(&self, text: &str) -> Result<(), MediaError>;
}

/// The desktop clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), MediaError> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// Copy text, logging instead of failing when no clipboard is usable
pub fn copy_to_clipboard<C: Clipboard + ?Sized>(clipboard: &C, text: &str) -> bool {
    match clipboard.set_text(text) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "could not copy to clipboard");
            false
        }
    }
}

/// Where transcript text ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    Copied,
    Printed,
}

/// Copy `text` to the clipboard, or write it to `out` when there is no
/// clipboard or copying fails
pub fn hand_off_text<C, W>(clipboard: Option<&C>, text: &str, out: &mut W) -> io::Result<Handoff>
where
    C: Clipboard + ?Sized,
    W: Write,
{
    if let Some(clipboard) = clipboard
        && copy_to_clipboard(clipboard, text)
    {
        return Ok(Handoff::Copied);
    }

    writeln!(out, "\n{text}")?;
    Ok(Handoff::Printed)
}
