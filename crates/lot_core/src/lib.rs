pub mod banner;
pub mod canvas;
pub mod dispatch;
pub mod identity;
pub mod input;
pub mod layout;
pub mod lot;
pub mod spot;
pub mod time;
pub mod view;

pub use banner::{BannerText, TitleBanner};
pub use canvas::{Canvas, ImageQuad, LotTextures, TextureId};
pub use lot::{ExpiryRecord, ParkingLot, SpotEvent, SpotEventKind, SpotId};
pub use spot::ParkingSpot;
pub use time::FrameClock;
