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

// Draw random genomes from the core soup and show which of them
// compile into well-typed integer programs. Most draws are
// infeasible; that's the point.

use std::env::args;

use pushdag::genome::Spawner;
use pushdag::push::Push;
use pushdag::soup::Soup;
use pushdag::types::Type;

const ATTEMPTS: usize = 100;

fn main() {
    let soup = Soup::core();
    let mut spawner = match args().nth(1).and_then(|raw| raw.parse().ok()) {
        Some(seed) => Spawner::with_seed(&soup, seed),
        None => Spawner::new(&soup),
    };

    let mut compiled = 0;
    for attempt in 0..ATTEMPTS {
        let code = spawner.spawn_code(10, 40);
        if let Some(dag) = Push::new().compile(&code, &Type::Int, false) {
            compiled += 1;
            println!(
                "#{:03} [{}] {}",
                attempt,
                dag.return_type(),
                dag.to_code()
            );
        }
    }
    println!();
    println!("{} of {} random genomes compiled", compiled, ATTEMPTS);
}
