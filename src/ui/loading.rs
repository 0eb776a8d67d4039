//! Loading screen shown while photos are being discovered
use iced::widget::{button, column, container, progress_bar, row, text};
use iced::{Alignment, Element, Length};

use memorial_gallery::discovery::{Notice, NoticeLevel, Status};

use crate::Message;

pub fn view(status: &Status, elapsed_secs: u64) -> Element<'_, Message> {
    let label = if status.label.is_empty() {
        "Initializing..."
    } else {
        status.label.as_str()
    };

    let stats = row![
        text(format!("Photos found: {}", status.found)).size(14),
        text(format!("Tested: {}/{}", status.tested, status.total)).size(14),
        text(format!("Elapsed: {}s", elapsed_secs)).size(14),
    ]
    .spacing(30);

    let content = column![
        text(format!("{}%", status.percent)).size(40),
        progress_bar(0.0..=1.0, status.fraction()).height(Length::Fixed(8.0)),
        text(label).size(16),
        stats,
    ]
    .spacing(16)
    .max_width(520)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// One-line banner for the last notice
pub fn notice(notice: &Notice) -> Element<'_, Message> {
    let icon = match notice.level {
        NoticeLevel::Success => "✅",
        NoticeLevel::Info => "ℹ️",
        NoticeLevel::Warning => "⚠️",
    };

    row![
        text(format!("{} {}", icon, notice.text)).size(16).width(Length::Fill),
        button("×").on_press(Message::DismissNotice).padding(4),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}
