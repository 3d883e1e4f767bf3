//! Benchmark for the shared frame dispatcher and pointer fan-out.
//!
//! TARGET: dispatch overhead negligible next to the components' own work
//!
//! Run with: cargo bench --package folio_core --bench dispatch_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use folio_core::{
    Animated, FrameClock, FrameContext, FrameDispatcher, PointerBus, PointerEvent,
    PointerPosition, PointerSubscription, Vec2,
};

struct Follower {
    pointer: PointerSubscription,
    last: Vec2,
}

impl Animated for Follower {
    fn on_frame(&mut self, _frame: &FrameContext) {
        for event in self.pointer.drain() {
            if let PointerEvent::Moved(position) = event {
                self.last = position.client;
            }
        }
        black_box(self.last);
    }
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for components in [4usize, 32, 256] {
        let bus = PointerBus::new();
        let mut dispatcher = FrameDispatcher::new();
        let mut clock = FrameClock::sixty_hz();
        let mounted: Vec<_> = (0..components)
            .map(|_| {
                dispatcher.mount(Follower {
                    pointer: bus.subscribe(),
                    last: Vec2::ZERO,
                })
            })
            .collect();

        group.throughput(Throughput::Elements(components as u64));
        group.bench_function(format!("frame_{components}"), |b| {
            let mut x = 0.0f32;
            b.iter(|| {
                x += 1.0;
                bus.publish(PointerEvent::Moved(PointerPosition::from_client(
                    Vec2::new(x, 0.0),
                    Vec2::ZERO,
                )));
                black_box(dispatcher.dispatch(clock.advance()))
            });
        });

        drop(mounted);
    }

    group.finish();
}

criterion_group!(benches, benchmark_dispatch);
criterion_main!(benches);
