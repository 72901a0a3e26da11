use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use orderflow_core::{RecordId, TenantId, UserId};
use orderflow_engine::{
    BulkTransitionCoordinator, InMemoryHistoryStore, InMemoryOrderStore, InMemoryProductStore,
    OrderStore, ProductStore, RetryPolicy, TransitionContext, TransitionExecutor,
};
use orderflow_inventory::{Product, ProductId};
use orderflow_orders::{Order, OrderId, OrderItem, OrderKind, OrderStatus, Quantity};

type Executor = TransitionExecutor<
    Arc<InMemoryOrderStore>,
    Arc<InMemoryProductStore>,
    Arc<InMemoryHistoryStore>,
>;

fn setup() -> (Executor, Arc<InMemoryOrderStore>, Arc<InMemoryProductStore>, TenantId) {
    let orders = Arc::new(InMemoryOrderStore::new());
    let products = Arc::new(InMemoryProductStore::new());
    let history = Arc::new(InMemoryHistoryStore::new());
    let executor = TransitionExecutor::new(orders.clone(), products.clone(), history.clone());
    (executor, orders, products, TenantId::new())
}

fn seed_order(
    orders: &Arc<InMemoryOrderStore>,
    products: &Arc<InMemoryProductStore>,
    tenant_id: TenantId,
    lines: usize,
) -> OrderId {
    let items: Vec<OrderItem> = (0..lines)
        .map(|_| {
            let product_id = ProductId::new(RecordId::new());
            products
                .insert(Product::new(product_id, tenant_id, "SKU", "Beans", 1_000))
                .unwrap();
            OrderItem {
                product_id,
                quantity: Quantity::Weight { grams: 250 },
                unit_price: 100,
            }
        })
        .collect();
    let order_id = OrderId::new(RecordId::new());
    orders
        .insert(
            Order::new(order_id, tenant_id, "WS-1", OrderKind::Sell, items, 0, Utc::now()).unwrap(),
        )
        .unwrap();
    order_id
}

fn bench_single_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_transition");
    for lines in [0usize, 1, 8, 32] {
        group.bench_with_input(BenchmarkId::new("cancel", lines), &lines, |b, &lines| {
            b.iter_batched(
                || {
                    let (executor, orders, products, tenant_id) = setup();
                    let order_id = seed_order(&orders, &products, tenant_id, lines);
                    let ctx = TransitionContext::new(tenant_id, UserId::new())
                        .with_cancellation_reason("benchmark");
                    (executor, order_id, ctx)
                },
                |(executor, order_id, ctx)| {
                    black_box(executor.transition(order_id, OrderStatus::Cancelled, &ctx))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_bulk_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_transition");
    for batch in [10usize, 100] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("confirm", batch), &batch, |b, &batch| {
            b.iter_batched(
                || {
                    let (executor, orders, products, tenant_id) = setup();
                    let ids: Vec<OrderId> = (0..batch)
                        .map(|_| seed_order(&orders, &products, tenant_id, 1))
                        .collect();
                    let coordinator = BulkTransitionCoordinator::new(
                        executor,
                        RetryPolicy::default().with_delay(Duration::ZERO),
                    );
                    let ctx = TransitionContext::new(tenant_id, UserId::new());
                    (coordinator, ids, ctx)
                },
                |(coordinator, ids, ctx)| {
                    black_box(coordinator.apply_to_many(&ids, OrderStatus::Confirmed, &ctx))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_transition, bench_bulk_transition);
criterion_main!(benches);
