use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use memorial_gallery::discovery::{
    DiscoveryEngine, DiscoveryReport, Notice, NoticeLevel, SiteProber, Status,
};
use memorial_gallery::gallery::{CategoryFilter, CropHint, PhotoCollection};
use memorial_gallery::AppConfig;

// Declare the ui module
mod ui;

type SharedEngine = Arc<tokio::sync::Mutex<DiscoveryEngine<SiteProber>>>;

/// Main application state
struct MemorialGallery {
    config: AppConfig,
    /// None when the configuration cannot produce a prober
    engine: Option<SharedEngine>,
    /// Written by the engine's progress observer, read on every tick
    live_status: Arc<Mutex<Status>>,
    status: Status,
    scanning: bool,
    /// Bumped for every run; reports from older runs are dropped
    generation: u64,
    started: Option<Instant>,
    photos: PhotoCollection,
    filter: CategoryFilter,
    crop: CropHint,
    /// Index into `photos` of the photo shown in the lightbox
    lightbox: Option<usize>,
    notice: Option<Notice>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Choose Folder"
    ChooseFolder,
    /// User clicked "Refresh"
    Refresh,
    /// Background discovery finished for the given run
    DiscoveryComplete(u64, DiscoveryReport),
    /// Loading screen refresh while scanning
    Tick,
    FilterSelected(CategoryFilter),
    CropSelected(CropHint),
    OpenLightbox(usize),
    CloseLightbox,
    DismissNotice,
}

impl MemorialGallery {
    /// Create a new instance of the application and start discovery
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("⚠️  {}, using defaults", e);
            AppConfig::default()
        });

        let mut app = Self::with_config(config);
        tracing::info!("🚀 Starting photo discovery in {}", app.config.site_root().display());
        let task = app.start_discovery();
        (app, task)
    }

    fn with_config(config: AppConfig) -> Self {
        let mut app = MemorialGallery {
            config,
            engine: None,
            live_status: Arc::new(Mutex::new(Status::default())),
            status: Status::default(),
            scanning: false,
            generation: 0,
            started: None,
            photos: PhotoCollection::new(),
            filter: CategoryFilter::All,
            crop: CropHint::default(),
            lightbox: None,
            notice: None,
        };
        app.rebuild_engine();
        app
    }

    /// Build a fresh engine from the current config
    fn rebuild_engine(&mut self) {
        // A run still in flight keeps writing to the old status slot
        self.live_status = Arc::new(Mutex::new(Status::default()));
        let live_status = Arc::clone(&self.live_status);
        let observer = move |status: &Status| {
            if let Ok(mut shared) = live_status.lock() {
                *shared = status.clone();
            }
        };

        self.engine = match self.config.engine() {
            Ok(engine) => Some(Arc::new(tokio::sync::Mutex::new(engine.with_observer(observer)))),
            Err(e) => {
                tracing::error!("❌ Cannot set up discovery: {}", e);
                self.notice = Some(Notice::new(NoticeLevel::Warning, e.to_string()));
                None
            }
        };
    }

    fn start_discovery(&mut self) -> Task<Message> {
        let Some(engine) = self.engine.clone() else {
            return Task::none();
        };
        if self.scanning {
            return Task::none();
        }

        self.scanning = true;
        self.generation += 1;
        self.started = Some(Instant::now());
        self.status = Status::default();
        self.lightbox = None;
        self.notice = Some(Notice::new(NoticeLevel::Info, "Scanning for new photos..."));

        let generation = self.generation;
        Task::perform(
            async move { engine.lock().await.refresh().await },
            move |report| Message::DiscoveryComplete(generation, report),
        )
    }

    /// Point discovery at a new local folder and rescan it
    ///
    /// A scan of the previous folder may still be running; its report is
    /// dropped when it arrives.
    fn select_folder(&mut self, folder: PathBuf) -> Task<Message> {
        tracing::info!("📁 Site folder: {}", folder.display());
        self.config.site_root = Some(folder);
        self.config.site_url = None;
        self.photos.clear();
        self.rebuild_engine();
        self.scanning = false;
        self.generation += 1;
        self.start_discovery()
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChooseFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select the site folder")
                    .pick_folder();

                match folder {
                    Some(folder_path) => self.select_folder(folder_path),
                    None => Task::none(),
                }
            }
            Message::Refresh => self.start_discovery(),
            Message::DiscoveryComplete(generation, report) => {
                if generation != self.generation {
                    tracing::debug!("Dropping report from superseded run {}", generation);
                    return Task::none();
                }
                self.scanning = false;
                self.photos = report.photos;
                // Fresh descriptors come with the default crop
                self.photos.apply_crop(self.crop);
                self.status = self.read_live_status();
                self.notice = Some(report.notice);
                if report.stalled {
                    tracing::warn!("⚠️  Discovery hit the safety deadline");
                }
                Task::none()
            }
            Message::Tick => {
                self.status = self.read_live_status();
                Task::none()
            }
            Message::FilterSelected(filter) => {
                self.filter = filter;
                Task::none()
            }
            Message::CropSelected(crop) => {
                self.crop = crop;
                self.photos.apply_crop(crop);
                self.notice = Some(Notice::new(
                    NoticeLevel::Success,
                    format!("Images cropped to show {}", crop),
                ));
                Task::none()
            }
            Message::OpenLightbox(index) => {
                if self.photos.get(index).is_some() {
                    self.lightbox = Some(index);
                }
                Task::none()
            }
            Message::CloseLightbox => {
                self.lightbox = None;
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    fn read_live_status(&self) -> Status {
        self.live_status
            .lock()
            .map(|status| status.clone())
            .unwrap_or_default()
    }

    fn elapsed_secs(&self) -> u64 {
        self.started.map(|t| t.elapsed().as_secs()).unwrap_or(0)
    }

    /// Local folder for image handles; hosted sites have none
    fn image_root(&self) -> Option<std::path::PathBuf> {
        match self.config.site_url {
            Some(_) => None,
            None => Some(self.config.site_root()),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.scanning {
            iced::time::every(Duration::from_secs(1)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let toolbar = row![
            text("In Loving Memory").size(32),
            button("Choose Folder")
                .on_press(Message::ChooseFolder)
                .padding(10),
            button("Refresh")
                .on_press_maybe((!self.scanning).then_some(Message::Refresh))
                .padding(10),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let image_root = self.image_root();

        let body: Element<Message> = if self.scanning {
            ui::loading::view(&self.status, self.elapsed_secs())
        } else if let Some(photo) = self.lightbox.and_then(|index| self.photos.get(index)) {
            ui::gallery::lightbox(photo, image_root.as_deref())
        } else {
            ui::gallery::view(&self.photos, self.filter, self.crop, image_root.as_deref())
        };

        let mut content = column![toolbar].spacing(20).padding(30);
        if let Some(notice) = &self.notice {
            content = content.push(ui::loading::notice(notice));
        }
        content = content.push(body);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application(
        "Memorial Gallery",
        MemorialGallery::update,
        MemorialGallery::view,
    )
    .subscription(MemorialGallery::subscription)
    .theme(MemorialGallery::theme)
    .centered()
    .run_with(MemorialGallery::new)
}
