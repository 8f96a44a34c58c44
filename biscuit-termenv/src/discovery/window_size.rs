//! Terminal window size.

use serde::{Deserialize, Serialize};

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Merges a live measurement with `fallback`, axis by axis: a zero or
    /// missing axis takes the fallback's value.
    pub fn or_fallback(measured: Option<WindowSize>, fallback: WindowSize) -> WindowSize {
        let measured = measured.unwrap_or_default();
        WindowSize {
            width: if measured.width == 0 {
                fallback.width
            } else {
                measured.width
            },
            height: if measured.height == 0 {
                fallback.height
            } else {
                measured.height
            },
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn measure() -> Option<WindowSize> {
    use terminal_size::{Height, Width, terminal_size};

    terminal_size().map(|(Width(w), Height(h))| WindowSize::new(u32::from(w), u32::from(h)))
}

#[cfg(target_arch = "wasm32")]
fn measure() -> Option<WindowSize> {
    None
}

/// The size of the terminal attached to this process, with `fallback`
/// substituted for any axis that cannot be measured.
///
/// ## Examples
///
/// ```
/// use biscuit_termenv::discovery::window_size::{window_size, WindowSize};
///
/// let size = window_size(WindowSize::new(80, 24));
/// assert!(size.width > 0 && size.height > 0);
/// ```
pub fn window_size(fallback: WindowSize) -> WindowSize {
    let measured = measure();
    tracing::trace!(?measured, ?fallback, "Measured terminal window");
    WindowSize::or_fallback(measured, fallback)
}
