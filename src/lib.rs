// pushdag: a code-building program synthesis kernel.
//
// Copyright (C) 2020  Brandon Lewis
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public License
// as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this program.  If not, see
// <https://www.gnu.org/licenses/>.

extern crate enumflags2;
extern crate indexmap;
extern crate rand;
#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod util;
pub mod collections;
pub mod dag;
pub mod expr;
pub mod genome;
pub mod library;
pub mod push;
pub mod reify;
pub mod soup;
pub mod types;
pub mod value;
