use super::errors::AppError;
use read_color::rgb;
use std::sync::{Mutex, MutexGuard};
use termion::color::Rgb;

/// Columns are shown to the user starting at 1.
pub fn get_column_label(col: usize) -> String {
    (col + 1).to_string()
}

/// Parses a column typed by the user into a 0-based index.
pub fn parse_input_column(input: &str, columns: usize) -> Option<usize> {
    let label: usize = input.trim().parse().ok()?;

    if label >= 1 && label <= columns {
        Some(label - 1)
    } else {
        None
    }
}

pub fn parse_color(text: &str) -> Result<Rgb, AppError> {
    if text.starts_with('#') {
        let mut chars = text.chars();
        chars.next();

        return match rgb(&mut chars) {
            Some([r, g, b]) => Ok(Rgb(r, g, b)),
            None => Err(AppError {
                message: format!("Can't parse hex color {}", text),
            }),
        };
    }

    Err(AppError {
        message: format!("Can't parse color {}", text),
    })
}

/// Locks a mutex shared with the receive thread. A panic on the other side
/// leaves the state readable, so poisoning is not propagated.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
