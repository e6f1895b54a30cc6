use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::query::{Ray, RayIntersection};
use crate::shape::{MaterialHandle, Primitive, HIT_EPSILON};

/// A triangle given by its three vertices.
///
/// Triangles are also the building block for meshes: a mesh is flattened
/// into its triangles before being handed to a tree builder.
#[derive(Copy, Clone, Debug)]
pub struct Triangle {
    /// The first vertex.
    pub a: Point<Real>,
    /// The second vertex.
    pub b: Point<Real>,
    /// The third vertex.
    pub c: Point<Real>,
    /// The material of the triangle, if any.
    pub material: Option<MaterialHandle>,
}

impl Triangle {
    /// Creates a triangle without a material.
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Self {
        Self {
            a,
            b,
            c,
            material: None,
        }
    }

    /// Creates a triangle with the given material.
    pub fn with_material(
        a: Point<Real>,
        b: Point<Real>,
        c: Point<Real>,
        material: MaterialHandle,
    ) -> Self {
        Self {
            a,
            b,
            c,
            material: Some(material),
        }
    }
}

impl Primitive for Triangle {
    fn aabb(&self) -> Aabb {
        Aabb::from_points([&self.a, &self.b, &self.c])
    }

    fn center(&self) -> Point<Real> {
        Point::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    fn cast_ray(&self, ray: &Ray, max_toi: Real) -> Option<RayIntersection> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;

        let pvec = ray.dir.cross(&ac);
        let det = ab.dot(&pvec);

        // The ray is parallel to the triangle plane.
        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.a;

        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(&ab);
        let v = ray.dir.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let toi = ac.dot(&qvec) * inv_det;
        if toi < HIT_EPSILON || toi > max_toi {
            return None;
        }

        let mut normal = ab.cross(&ac).normalize();
        if normal.dot(&ray.dir) > 0.0 {
            normal = -normal;
        }

        Some(RayIntersection::new(toi, normal))
    }

    fn material(&self) -> Option<MaterialHandle> {
        self.material
    }
}

#[cfg(test)]
mod test {
    use super::Triangle;
    use crate::math::{Point, Real, Vector};
    use crate::query::Ray;
    use crate::shape::Primitive;
    use approx::relative_eq;

    fn xy_triangle() -> Triangle {
        Triangle::new(
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn hits_the_interior() {
        let ray = Ray::new(Point::new(0.0, 0.0, -2.0), Vector::z());
        let inter = xy_triangle().cast_ray(&ray, Real::MAX).unwrap();

        assert!(relative_eq!(inter.time_of_impact, 2.0, epsilon = 1.0e-4));
        // The normal faces the incoming ray.
        assert!(relative_eq!(inter.normal, -Vector::z(), epsilon = 1.0e-4));
    }

    #[test]
    fn misses_outside_the_edges() {
        let ray = Ray::new(Point::new(1.0, 1.0, -2.0), Vector::z());
        assert!(xy_triangle().cast_ray(&ray, Real::MAX).is_none());
    }

    #[test]
    fn parallel_rays_miss() {
        let ray = Ray::new(Point::new(-5.0, 0.0, 0.5), Vector::x());
        assert!(xy_triangle().cast_ray(&ray, Real::MAX).is_none());

        // Coplanar rays miss too.
        let coplanar = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::x());
        assert!(xy_triangle().cast_ray(&coplanar, Real::MAX).is_none());
    }

    #[test]
    fn centroid_is_the_vertex_mean() {
        let center = xy_triangle().center();
        assert!(relative_eq!(
            center,
            Point::new(0.0, -1.0 / 3.0, 0.0),
            epsilon = 1.0e-6
        ));
    }
}
