/// Desktop views
///
/// - Loading screen and notice banner (loading.rs)
/// - Photo grid, filters and lightbox (gallery.rs)

pub mod gallery;
pub mod loading;
