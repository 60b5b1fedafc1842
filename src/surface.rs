use crate::display::Announcement;
use crate::menu::Menu;

/// Rendering collaborator driven by the event loop.
///
/// Implementations own every UI object; the core hands them plain data.
/// Expiry of an announcement is reported back through
/// [`NewsBarHandle::animation_finished`](crate::app::NewsBarHandle::animation_finished)
/// or left to the event loop's own timer.
pub trait Surface: Send + 'static {
    /// Show the static icon.
    fn on_idle(&mut self);

    /// Start scrolling `announcement.scroll_text()`, one loop every
    /// `announcement.loop_duration()`.
    fn on_announce(&mut self, announcement: &Announcement);

    fn on_menu(&mut self, menu: &Menu);
}
