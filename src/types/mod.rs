mod image;
pub use image::Image;

mod datetime;
pub use datetime::TimeStamp;
