use glam::Vec3;
use half::f16;
use nom::{
    IResult as _IResult, Parser,
    combinator::map,
    multi::count,
    number::complete::{le_f32, le_u16},
};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

pub fn vec3(i: &[u8]) -> IResult<Vec3> {
    map(count(le_f32, 3), |res| Vec3::from_slice(res.as_slice())).parse(i)
}

/// IEEE-754 binary16, widened.
pub fn le_f16(i: &[u8]) -> IResult<f32> {
    map(le_u16, |bits| f16::from_bits(bits).to_f32()).parse(i)
}
