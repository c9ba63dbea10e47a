use std::{
    array,
    ops::{Add, Mul, Neg, RangeInclusive, Sub},
};

use bytemuck::NoUninit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Vec<T, const N: usize>([T; N]);

impl<const N: usize> Vec<f32, N> {
    pub fn dot(self, other: Self) -> f32 {
        self.0.iter().zip(&other.0).map(|(&a, &b)| a * b).sum()
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn dist(self, other: Self) -> f32 {
        (other - self).length()
    }
}

impl<T: Copy> Vec<T, 2> {
    pub fn x(self) -> T {
        self.0[0]
    }

    pub fn y(self) -> T {
        self.0[1]
    }
}

impl<T: Copy> Vec<T, 3> {
    pub fn x(self) -> T {
        self.0[0]
    }

    pub fn y(self) -> T {
        self.0[1]
    }

    pub fn z(self) -> T {
        self.0[2]
    }
}

impl Vec3f {
    pub fn cross(self, rhs: Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = rhs.0;
        vec3(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }
}

// Safety: `[T; N]` has no padding iff `T` has no padding.
unsafe impl<T: NoUninit, const N: usize> NoUninit for Vec<T, N> {}

pub type Vec2<T> = Vec<T, 2>;
pub type Vec2f = Vec2<f32>;
pub type Vec2u = Vec2<u32>;
pub type Vec3<T> = Vec<T, 3>;
pub type Vec3f = Vec3<f32>;

impl<T, const N: usize> From<[T; N]> for Vec<T, N> {
    fn from(value: [T; N]) -> Self {
        Self(value)
    }
}

impl<T, const N: usize> From<Vec<T, N>> for [T; N] {
    fn from(value: Vec<T, N>) -> Self {
        value.0
    }
}

impl<T, const N: usize> Add<Vec<T, N>> for Vec<T, N>
where
    T: Add<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn add(self, rhs: Vec<T, N>) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<T, const N: usize> Sub<Vec<T, N>> for Vec<T, N>
where
    T: Sub<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn sub(self, rhs: Vec<T, N>) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl<T, const N: usize> Neg for Vec<T, N>
where
    T: Neg<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn neg(self) -> Self::Output {
        Vec(array::from_fn(|i| -self.0[i]))
    }
}

impl<T, const N: usize> Mul<T> for Vec<T, N>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn mul(self, rhs: T) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] * rhs))
    }
}

pub fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vec([x, y])
}

pub fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> {
    Vec([x, y, z])
}

pub fn lerp<R>(range: RangeInclusive<R>, t: f32) -> R
where
    R: Copy + Add<R, Output = R> + Mul<f32, Output = R>,
{
    *range.start() * (1.0 - t) + *range.end() * t
}

/// `n` evenly spaced samples over `range`, both ends included.
///
/// `n == 1` yields just the start of the range.
pub fn linspace(range: RangeInclusive<f32>, n: usize) -> impl Iterator<Item = f32> {
    let last = n.saturating_sub(1).max(1) as f32;
    (0..n).map(move |i| lerp(range.clone(), i as f32 / last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = vec3(1.0, 0.0, 0.0);
        let y = vec3(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), vec3(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), -vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn length_and_dist() {
        assert_eq!(vec2(3.0, 4.0).length(), 5.0);
        assert_eq!(vec3(1.0, 1.0, 1.0).dist(vec3(1.0, 1.0, 3.0)), 2.0);
    }

    #[test]
    fn linspace_includes_both_ends() {
        let samples: std::vec::Vec<f32> = linspace(0.0..=1.0, 5).collect();
        assert_eq!(samples, [0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0..=3.0, 1).collect::<std::vec::Vec<_>>(), [2.0]);
        assert_eq!(linspace(0.0..=1.0, 0).count(), 0);
    }
}
