use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::{Ray, RayIntersection};
use crate::shape::{MaterialHandle, Primitive, HIT_EPSILON};

/// A sphere.
#[derive(Copy, Clone, Debug)]
pub struct Sphere {
    /// The center of the sphere.
    pub center: Point<Real>,
    /// The radius of the sphere.
    pub radius: Real,
    /// The material of the sphere, if any.
    pub material: Option<MaterialHandle>,
}

impl Sphere {
    /// Creates a sphere without a material.
    pub fn new(center: Point<Real>, radius: Real) -> Self {
        Self {
            center,
            radius,
            material: None,
        }
    }

    /// Creates a sphere with the given material.
    pub fn with_material(center: Point<Real>, radius: Real, material: MaterialHandle) -> Self {
        Self {
            center,
            radius,
            material: Some(material),
        }
    }
}

impl Primitive for Sphere {
    fn aabb(&self) -> Aabb {
        let half_extents = Vector::repeat(self.radius);
        Aabb::new(self.center - half_extents, self.center + half_extents)
    }

    fn center(&self) -> Point<Real> {
        self.center
    }

    fn cast_ray(&self, ray: &Ray, max_toi: Real) -> Option<RayIntersection> {
        let dcenter = ray.origin - self.center;

        let a = ray.dir.norm_squared();
        let b = dcenter.dot(&ray.dir);
        let c = dcenter.norm_squared() - self.radius * self.radius;

        if a == 0.0 || (c > 0.0 && b > 0.0) {
            return None;
        }

        let delta = b * b - a * c;
        if delta < 0.0 {
            return None;
        }

        let sqrt_delta = delta.sqrt();

        // Nearest root past the self-intersection epsilon; the far root only
        // qualifies when the origin is inside the sphere.
        let (toi, inside) = if (-b - sqrt_delta) / a >= HIT_EPSILON {
            ((-b - sqrt_delta) / a, false)
        } else if (-b + sqrt_delta) / a >= HIT_EPSILON {
            ((-b + sqrt_delta) / a, true)
        } else {
            return None;
        };

        if toi > max_toi {
            return None;
        }

        let normal = (ray.point_at(toi) - self.center) / self.radius;
        Some(RayIntersection::new(
            toi,
            if inside { -normal } else { normal },
        ))
    }

    fn material(&self) -> Option<MaterialHandle> {
        self.material
    }
}

#[cfg(test)]
mod test {
    use super::Sphere;
    use crate::math::{Point, Real, Vector};
    use crate::query::Ray;
    use crate::shape::{MaterialHandle, Primitive};
    use approx::relative_eq;

    #[test]
    fn hits_frontally() {
        let sphere = Sphere::new(Point::origin(), 0.5);
        let ray = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::x());

        let inter = sphere.cast_ray(&ray, Real::MAX).unwrap();
        assert!(relative_eq!(inter.time_of_impact, 4.5, epsilon = 1.0e-4));
        assert!(relative_eq!(inter.normal, -Vector::x(), epsilon = 1.0e-4));
    }

    #[test]
    fn misses_sideways() {
        let sphere = Sphere::new(Point::origin(), 0.5);
        let ray = Ray::new(Point::new(-5.0, 1.0, 0.0), Vector::x());
        assert!(sphere.cast_ray(&ray, Real::MAX).is_none());
    }

    #[test]
    fn inside_hit_flips_the_normal() {
        let sphere = Sphere::new(Point::origin(), 1.0);
        let ray = Ray::new(Point::origin(), Vector::x());

        let inter = sphere.cast_ray(&ray, Real::MAX).unwrap();
        assert!(relative_eq!(inter.time_of_impact, 1.0, epsilon = 1.0e-4));
        // The outward normal at (1, 0, 0) is +x; it is flipped inward.
        assert!(relative_eq!(inter.normal, -Vector::x(), epsilon = 1.0e-4));
    }

    #[test]
    fn grazing_hit_at_the_surface_is_rejected() {
        // A secondary ray starting exactly on the surface must not re-hit it.
        let sphere = Sphere::new(Point::origin(), 0.5);
        let ray = Ray::new(Point::new(0.5, 0.0, 0.0), Vector::x());
        assert!(sphere.cast_ray(&ray, Real::MAX).is_none());
    }

    #[test]
    fn respects_max_toi_and_carries_the_material() {
        let sphere = Sphere::with_material(Point::origin(), 0.5, MaterialHandle(3));
        let ray = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::x());

        assert!(sphere.cast_ray(&ray, 4.0).is_none());
        assert!(sphere.cast_ray(&ray, 5.0).is_some());
        assert_eq!(sphere.material(), Some(MaterialHandle(3)));
    }
}
