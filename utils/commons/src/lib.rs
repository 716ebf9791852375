//! It exposes all structs and types shared by the marketplace contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{calculations::*, constants::*, errors::*, structs::*, types::*};
use concordium_cis1::*;
use concordium_std::*;

pub mod test;

mod calculations;
mod constants;
mod errors;
mod structs;
mod types;
