pub mod euclidean;
pub mod sphere;
pub mod static_spherical;

pub use euclidean::Euclidean;
pub use sphere::Sphere;
pub use static_spherical::StaticSpherical;
