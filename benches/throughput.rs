use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringseq::{BusySpinWaitStrategy, MultiProducerSequencer, Sequence, SequencerConfig};
use std::sync::Arc;
use std::thread;

const CLAIMS_PER_PRODUCER: u64 = 1_000_000;

fn bench_single_producer_claim_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_producer");
    group.throughput(Throughput::Elements(CLAIMS_PER_PRODUCER));

    group.bench_function("next_then_publish", |b| {
        b.iter(|| {
            let sequencer = MultiProducerSequencer::new(SequencerConfig::new(1 << 16), Arc::new(BusySpinWaitStrategy::new()));
            let consumed = Arc::new(Sequence::new());
            sequencer.set_gating_sequences(vec![Arc::clone(&consumed)]);

            for i in 0..CLAIMS_PER_PRODUCER as i64 {
                let s = sequencer.next();
                sequencer.publish(s);
                // Keep the gating consumer caught up so the cache never has
                // to stall on capacity.
                if i % 4096 == 0 {
                    consumed.set(s);
                }
            }
            black_box(sequencer.remaining_capacity());
        });
    });

    group.finish();
}

fn bench_contended_claim(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_claim");

    for num_producers in [2, 4, 8].iter() {
        let total = CLAIMS_PER_PRODUCER * (*num_producers as u64);
        group.throughput(Throughput::Elements(total));

        group.bench_with_input(BenchmarkId::from_parameter(format!("{num_producers}P")), num_producers, |b, &n| {
            b.iter(|| {
                let sequencer = Arc::new(MultiProducerSequencer::new(SequencerConfig::new(1 << 16), Arc::new(BusySpinWaitStrategy::new())));
                let consumed = Arc::new(Sequence::new());
                sequencer.set_gating_sequences(vec![Arc::clone(&consumed)]);

                let handles: Vec<_> = (0..n)
                    .map(|_| {
                        let sequencer = Arc::clone(&sequencer);
                        let consumed = Arc::clone(&consumed);
                        thread::spawn(move || {
                            for i in 0..CLAIMS_PER_PRODUCER as i64 {
                                let s = sequencer.next();
                                sequencer.publish(s);
                                if i % 4096 == 0 {
                                    consumed.set(s);
                                }
                            }
                        })
                    })
                    .collect();

                for h in handles {
                    h.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

fn bench_wait_for_already_available(c: &mut Criterion) {
    let mut group = c.benchmark_group("wait_for");

    group.bench_function("busy_spin_already_published", |b| {
        let sequencer = Arc::new(MultiProducerSequencer::new(SequencerConfig::new(1 << 16), Arc::new(BusySpinWaitStrategy::new())));
        sequencer.next_n(1024).unwrap();
        sequencer.publish_range(0, 1023);
        let barrier = ringseq::SequenceBarrier::new(Arc::clone(&sequencer), Arc::new(BusySpinWaitStrategy::new()), Vec::new());

        b.iter(|| {
            black_box(barrier.wait_for(black_box(512)).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_single_producer_claim_publish, bench_contended_claim, bench_wait_for_already_available);
criterion_main!(benches);
