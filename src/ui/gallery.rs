//! Photo grid with category filter, crop selector and lightbox
use std::path::Path;

use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, Column, Image, Row};
use iced::{Alignment, Element, Length, Theme};

use memorial_gallery::gallery::{
    Category, CategoryFilter, CropHint, PhotoCollection, PhotoDescriptor,
};

use crate::Message;

/// Tiles per grid row
const COLUMNS: usize = 3;
const TILE_HEIGHT: f32 = 180.0;

type ButtonStyle = fn(&Theme, button::Status) -> button::Style;

fn toggle_style(active: bool) -> ButtonStyle {
    if active {
        button::primary
    } else {
        button::secondary
    }
}

/// Which edge of the photo stays in view when the tile clips it
fn crop_alignment(crop: CropHint) -> (Horizontal, Vertical) {
    match crop {
        CropHint::Top => (Horizontal::Center, Vertical::Top),
        CropHint::Bottom => (Horizontal::Center, Vertical::Bottom),
        CropHint::Left => (Horizontal::Left, Vertical::Center),
        CropHint::Right => (Horizontal::Right, Vertical::Center),
        CropHint::Center => (Horizontal::Center, Vertical::Center),
    }
}

fn picture<'a>(photo: &PhotoDescriptor, root: Option<&Path>) -> Element<'a, Message> {
    match root {
        Some(root) => Image::new(Handle::from_path(root.join(&photo.path)))
            .width(Length::Fill)
            .into(),
        None => text(photo.alt_text.clone()).size(14).into(),
    }
}

fn filter_bar<'a>(photos: &PhotoCollection, active: CategoryFilter) -> Element<'a, Message> {
    let mut filters = vec![CategoryFilter::All];
    filters.extend(Category::ALL.iter().map(|category| CategoryFilter::Only(*category)));

    let buttons: Vec<Element<'a, Message>> = filters
        .into_iter()
        .map(|filter| {
            let label = match filter {
                CategoryFilter::All => "all".to_string(),
                CategoryFilter::Only(category) => category.to_string(),
            };
            button(text(label))
                .on_press(Message::FilterSelected(filter))
                .style(toggle_style(filter == active))
                .into()
        })
        .collect();

    row![
        Row::with_children(buttons).spacing(8),
        text(format!("Photos: {}", photos.count_label(active))).size(16),
    ]
    .spacing(20)
    .align_y(Alignment::Center)
    .into()
}

fn crop_bar<'a>(active: CropHint) -> Element<'a, Message> {
    let buttons: Vec<Element<'a, Message>> = CropHint::ALL
        .iter()
        .map(|crop| {
            button(text(crop.to_string()))
                .on_press(Message::CropSelected(*crop))
                .style(toggle_style(*crop == active))
                .into()
        })
        .collect();

    row![text("Crop:").size(16), Row::with_children(buttons).spacing(8)]
        .spacing(12)
        .align_y(Alignment::Center)
        .into()
}

fn tile<'a>(index: usize, photo: &'a PhotoDescriptor, root: Option<&Path>) -> Element<'a, Message> {
    let (align_x, align_y) = crop_alignment(photo.crop_hint);

    let frame = container(picture(photo, root))
        .width(Length::Fill)
        .height(Length::Fixed(TILE_HEIGHT))
        .align_x(align_x)
        .align_y(align_y)
        .clip(true);

    let caption = column![
        text(photo.title.as_str()).size(16),
        text(photo.description.as_str()).size(12),
        button("View").on_press(Message::OpenLightbox(index)).padding(6),
    ]
    .spacing(6);

    column![frame, caption]
        .spacing(8)
        .width(Length::FillPortion(1))
        .into()
}

/// Gallery grid for the current filter
pub fn view<'a>(
    photos: &'a PhotoCollection,
    filter: CategoryFilter,
    crop: CropHint,
    root: Option<&Path>,
) -> Element<'a, Message> {
    let visible: Vec<(usize, &PhotoDescriptor)> = photos
        .iter()
        .enumerate()
        .filter(|(_, photo)| filter.matches(photo))
        .collect();

    let grid: Element<'a, Message> = if visible.is_empty() {
        container(text("No photos to show yet. Add photos to the site folder and press Refresh."))
            .padding(40)
            .into()
    } else {
        let rows: Vec<Element<'a, Message>> = visible
            .chunks(COLUMNS)
            .map(|chunk| {
                let mut tiles: Vec<Element<'a, Message>> = chunk
                    .iter()
                    .map(|(index, photo)| tile(*index, *photo, root))
                    .collect();
                // Keep tiles in the last row the same width as the rest
                while tiles.len() < COLUMNS {
                    tiles.push(container(text("")).width(Length::FillPortion(1)).into());
                }
                Row::with_children(tiles).spacing(16).into()
            })
            .collect();

        scrollable(Column::with_children(rows).spacing(24))
            .height(Length::Fill)
            .into()
    };

    column![filter_bar(photos, filter), crop_bar(crop), grid]
        .spacing(16)
        .into()
}

/// Single photo with its caption
pub fn lightbox<'a>(photo: &'a PhotoDescriptor, root: Option<&Path>) -> Element<'a, Message> {
    let content = column![
        container(picture(photo, root))
            .width(Length::Fill)
            .height(Length::FillPortion(5))
            .center_x(Length::Fill),
        text(photo.title.as_str()).size(24),
        text(photo.description.as_str()).size(16),
        button("Close").on_press(Message::CloseLightbox).padding(10),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
