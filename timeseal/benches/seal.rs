/*
 * Copyright 2025 by Ideal Labs, LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use ark_ff::{UniformRand, Zero};
use criterion::{
	black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};
use rand::rngs::OsRng;
use timeseal::bbs::Bbs;
use timeseal::group::{pair, product_pair, G1, G2, Gt};
use timeseal::hibs::Hibs;
use timeseal::timeforge::TimeForge;

/// Path depth is the interesting axis for the hierarchy: verification
/// pays one pairing slot per level.
fn hibs_depths(c: &mut Criterion) {
	let mut h = Hibs::setup(&mut OsRng);

	let mut group = c.benchmark_group("hibs");
	for depth in [1usize, 2, 3, 4, 5, 6, 7].iter() {
		let path: Vec<String> =
			(0..*depth).map(|level| format!("{:02}", level)).collect();

		group.bench_with_input(
			BenchmarkId::new("sign", depth),
			depth,
			|b, _| {
				b.iter(|| h.sign(black_box("winning"), black_box(&path)));
			},
		);

		let signature = h.sign("winning", &path);
		group.bench_with_input(
			BenchmarkId::new("verify", depth),
			depth,
			|b, _| {
				b.iter(|| {
					h.verify(
						black_box(&signature),
						black_box("winning"),
						black_box(&path),
					)
					.unwrap()
				});
			},
		);
	}
	group.finish();
}

fn timeforge(c: &mut Criterion) {
	let server = Bbs::generate(&mut OsRng);
	let tf = TimeForge::generate(server.public.clone(), &mut OsRng);

	let mut group = c.benchmark_group("timeforge");
	group.bench_function("sign", |b| {
		b.iter(|| tf.sign(black_box("winning"), &mut OsRng));
	});

	let signature = tf.sign("winning", &mut OsRng);
	group.bench_function("verify", |b| {
		b.iter(|| tf.verify(black_box("winning"), black_box(&signature)));
	});
	group.finish();
}

/// The shared-Miller-loop product against the naive fold it replaces.
fn pairing_products(c: &mut Criterion) {
	let ps: Vec<G1> = (0..16).map(|_| G1::rand(&mut OsRng)).collect();
	let qs: Vec<G2> = (0..16).map(|_| G2::rand(&mut OsRng)).collect();

	let mut group = c.benchmark_group("pairing");
	group.bench_function("fold_16", |b| {
		b.iter(|| {
			ps.iter()
				.zip(qs.iter())
				.fold(Gt::zero(), |acc, (p, q)| acc + pair(p, q))
		});
	});
	group.bench_function("product_16", |b| {
		b.iter(|| product_pair(black_box(&ps), black_box(&qs)).unwrap());
	});
	group.finish();
}

criterion_group!(benches, hibs_depths, timeforge, pairing_products);
criterion_main!(benches);
