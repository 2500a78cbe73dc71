/*
 * Vector Module
 *
 * This module defines the small 2D/3D vector value type used by the whole
 * simulation. A vector is 2D when `z` is `None` and 3D otherwise; binary
 * operations refuse to mix the two instead of silently padding with zero.
 *
 * Mutating operations return the receiver so calls can be chained, e.g.
 * `velocity.add(&force)?.normalize().scale(speed)`.
 */

use std::ops::Mul;

use nannou::prelude::Vec2;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("vectors must have the same number of dimensions (got {left}D and {right}D)")]
    DimensionMismatch { left: usize, right: usize },

    #[error("cannot normalize a zero-length vector")]
    Degenerate,

    #[error("direction angle is only defined for 2D vectors")]
    AngleUndefined3d,
}

// Result of a cross product: a scalar in 2D, a vector in 3D
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cross {
    Scalar(f32),
    Vector(Vector),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0, z: None };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    pub const fn new3(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z: Some(z) }
    }

    // Build a 2D vector pointing along `angle` (radians) with the given length
    pub fn from_angle(angle: f32, magnitude: f32) -> Self {
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    pub fn dimensions(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }

    fn check_dimensions(&self, other: &Vector) -> Result<(), VectorError> {
        if self.z.is_some() == other.z.is_some() {
            Ok(())
        } else {
            Err(VectorError::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            })
        }
    }

    // In-place addition
    pub fn add(&mut self, other: &Vector) -> Result<&mut Self, VectorError> {
        self.check_dimensions(other)?;
        self.x += other.x;
        self.y += other.y;
        if let (Some(z), Some(oz)) = (self.z.as_mut(), other.z) {
            *z += oz;
        }
        Ok(self)
    }

    // In-place subtraction
    pub fn sub(&mut self, other: &Vector) -> Result<&mut Self, VectorError> {
        self.check_dimensions(other)?;
        self.x -= other.x;
        self.y -= other.y;
        if let (Some(z), Some(oz)) = (self.z.as_mut(), other.z) {
            *z -= oz;
        }
        Ok(self)
    }

    pub fn length_squared(&self) -> f32 {
        let z = self.z.unwrap_or(0.0);
        self.x * self.x + self.y * self.y + z * z
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    // Divide every component by the Euclidean norm.
    // A zero-length vector ends up with NaN components; use `try_normalize`
    // where that case can occur.
    pub fn normalize(&mut self) -> &mut Self {
        let length = self.length();
        self.x /= length;
        self.y /= length;
        if let Some(z) = self.z.as_mut() {
            *z /= length;
        }
        self
    }

    pub fn try_normalize(&mut self) -> Result<&mut Self, VectorError> {
        let length_squared = self.length_squared();
        if length_squared <= f32::EPSILON * f32::EPSILON || !length_squared.is_finite() {
            return Err(VectorError::Degenerate);
        }
        Ok(self.normalize())
    }

    pub fn normalized(&self) -> Vector {
        let mut copy = *self;
        copy.normalize();
        copy
    }

    // Scalar multiplication
    pub fn scale(&mut self, scalar: f32) -> &mut Self {
        self.x *= scalar;
        self.y *= scalar;
        if let Some(z) = self.z.as_mut() {
            *z *= scalar;
        }
        self
    }

    pub fn dot(&self, other: &Vector) -> Result<f32, VectorError> {
        self.check_dimensions(other)?;
        Ok(self.x * other.x + self.y * other.y + self.z.unwrap_or(0.0) * other.z.unwrap_or(0.0))
    }

    pub fn cross(&self, other: &Vector) -> Result<Cross, VectorError> {
        self.check_dimensions(other)?;
        match (self.z, other.z) {
            (Some(az), Some(bz)) => Ok(Cross::Vector(Vector::new3(
                self.y * bz - az * other.y,
                az * other.x - self.x * bz,
                self.x * other.y - self.y * other.x,
            ))),
            _ => Ok(Cross::Scalar(self.x * other.y - self.y * other.x)),
        }
    }

    // Direction angle in radians, measured from +x towards +y
    pub fn angle(&self) -> Result<f32, VectorError> {
        match self.z {
            None => Ok(self.y.atan2(self.x)),
            Some(_) => Err(VectorError::AngleUndefined3d),
        }
    }

    pub fn distance(&self, other: &Vector) -> Result<f32, VectorError> {
        let mut diff = *self;
        diff.sub(other)?;
        Ok(diff.length())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f32::is_finite)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;

    fn mul(mut self, scalar: f32) -> Vector {
        self.scale(scalar);
        self
    }
}

impl From<Vector> for Vec2 {
    fn from(v: Vector) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn normalized_has_unit_length_and_same_direction() {
        let samples = [
            Vector::new(3.0, 4.0),
            Vector::new(-0.001, 250.0),
            Vector::new(-7.5, -7.5),
            Vector::new3(1.0, 2.0, 2.0),
        ];
        for v in samples {
            let n = v.normalized();
            assert!((n.length() - 1.0).abs() < EPS, "{v:?} -> {n:?}");
            assert!(v.dot(&n).unwrap() > 0.0);
        }
    }

    #[test]
    fn normalize_chains_with_scale() {
        let mut v = Vector::new(0.0, -2.0);
        v.normalize().scale(300.0);
        assert!((v.y + 300.0).abs() < EPS);
        assert_eq!(v.x, 0.0);
    }

    #[test]
    fn zero_vector_cannot_be_normalized_safely() {
        let mut v = Vector::ZERO;
        assert_eq!(v.try_normalize().unwrap_err(), VectorError::Degenerate);
        assert_eq!(v, Vector::ZERO);
        assert!(!Vector::ZERO.normalized().is_finite());
    }

    #[test]
    fn add_is_commutative_and_associative() {
        let a = Vector::new(1.5, -2.0);
        let b = Vector::new(0.25, 8.0);
        let c = Vector::new(-4.0, 3.5);

        let mut ab = a;
        ab.add(&b).unwrap();
        let mut ba = b;
        ba.add(&a).unwrap();
        assert_eq!(ab, ba);

        let mut left = a;
        left.add(&b).unwrap().add(&c).unwrap();
        let mut bc = b;
        bc.add(&c).unwrap();
        let mut right = a;
        right.add(&bc).unwrap();
        assert!((left.x - right.x).abs() < EPS);
        assert!((left.y - right.y).abs() < EPS);
    }

    #[test]
    fn mixing_dimensions_fails() {
        let mut flat = Vector::new(1.0, 1.0);
        let deep = Vector::new3(1.0, 1.0, 1.0);

        assert_eq!(
            flat.add(&deep).unwrap_err(),
            VectorError::DimensionMismatch { left: 2, right: 3 }
        );
        // the failed add must not have touched the receiver
        assert_eq!(flat, Vector::new(1.0, 1.0));
        assert!(flat.dot(&deep).is_err());
        assert!(deep.cross(&flat).is_err());
        assert!(flat.distance(&deep).is_err());
    }

    #[test]
    fn three_dimensional_add_keeps_z() {
        let mut a = Vector::new3(1.0, 2.0, 3.0);
        a.add(&Vector::new3(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(a, Vector::new3(2.0, 3.0, 4.0));
    }

    #[test]
    fn cross_product_shape_depends_on_dimensions() {
        let x = Vector::new(1.0, 0.0);
        let y = Vector::new(0.0, 1.0);
        assert_eq!(x.cross(&y).unwrap(), Cross::Scalar(1.0));

        let x3 = Vector::new3(1.0, 0.0, 0.0);
        let y3 = Vector::new3(0.0, 1.0, 0.0);
        assert_eq!(x3.cross(&y3).unwrap(), Cross::Vector(Vector::new3(0.0, 0.0, 1.0)));
    }

    #[test]
    fn angle_is_two_dimensional_only() {
        let v = Vector::new(0.0, 2.0);
        assert!((v.angle().unwrap() - std::f32::consts::FRAC_PI_2).abs() < EPS);
        assert_eq!(
            Vector::new3(1.0, 0.0, 0.0).angle().unwrap_err(),
            VectorError::AngleUndefined3d
        );
    }

    #[test]
    fn from_angle_round_trips_through_angle() {
        let v = Vector::from_angle(2.0, 150.0);
        assert!((v.length() - 150.0).abs() < 1e-3);
        assert!((v.angle().unwrap() - 2.0).abs() < EPS);
    }
}
