use medchat_core::{ChatEntry, Completion, ExchangeController, Ticket};
use ratatui::layout::Rect;

use crate::ui;

/// Fallbacks used before the first frame has told us the real chat size
const DEFAULT_WRAP_WIDTH: u16 = 50;
const DEFAULT_VISIBLE_HEIGHT: u16 = 20;

pub struct App {
    pub should_quit: bool,
    pub controller: ExchangeController,
    pub endpoint: String,

    // Chat viewport
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat pane, set during render
    pub chat_width: u16,  // inner width, for wrap calculations
    pub chat_area: Option<Rect>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // What the view last saw, to know when to jump to the newest entry
    seen_revision: u64,
    seen_pending: bool,
}

impl App {
    pub fn new(controller: ExchangeController, endpoint: impl Into<String>) -> Self {
        let mut app = Self {
            should_quit: false,
            controller,
            endpoint: endpoint.into(),
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,
            animation_frame: 0,
            seen_revision: 0,
            seen_pending: false,
        };
        app.follow_history();
        app
    }

    pub fn entries(&self) -> &[ChatEntry] {
        self.controller.history().entries()
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    /// Send the input box contents
    pub fn submit(&mut self) -> Option<Ticket> {
        let ticket = self.controller.submit_input();
        self.follow_history();
        ticket
    }

    pub fn settle(&mut self, completion: Completion) {
        self.controller.settle(completion);
        self.follow_history();
    }

    /// Scroll to the bottom whenever an entry was appended or the thinking
    /// indicator appeared or went away.
    pub fn follow_history(&mut self) {
        let revision = self.controller.history().revision();
        let pending = self.controller.is_pending();
        if revision != self.seen_revision || pending != self.seen_pending {
            self.seen_revision = revision;
            self.seen_pending = pending;
            self.scroll_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }

    fn wrap_width(&self) -> usize {
        if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            DEFAULT_WRAP_WIDTH as usize
        }
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            DEFAULT_VISIBLE_HEIGHT
        }
    }

    /// Number of rendered chat lines at the current pane width
    pub fn total_chat_lines(&self) -> u16 {
        let total_lines = ui::chat_lines(self, self.wrap_width()).len();
        total_lines.min(u16::MAX as usize) as u16
    }

    fn max_scroll(&self) -> u16 {
        self.total_chat_lines().saturating_sub(self.visible_height())
    }

    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self.max_scroll();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_page_down(&mut self) {
        let page = (self.visible_height() / 2).max(1);
        self.scroll_down(page);
    }

    pub fn scroll_page_up(&mut self) {
        let page = (self.visible_height() / 2).max(1);
        self.scroll_up(page);
    }
}
