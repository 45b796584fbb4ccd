/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Utility types shared by the calculation and template modules

pub mod parse;
pub mod vector;

pub use parse::parse_number_list;
pub use vector::Vector3D;
