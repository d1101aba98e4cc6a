use criterion::{Criterion, black_box, criterion_group, criterion_main};
use library_service::domain::{Book, Loan, User};
use uuid::Uuid;
use validator::Validate;

fn bench_validation(c: &mut Criterion) {
    let book = Book::new("Standard Book Name", Uuid::new_v4(), "Some Author").with_description(
        "This is a description that is being validated. It's a standard size description string.",
    );
    let user = User::new("Reader", "reader@example.com");
    let loan = Loan::new(Uuid::new_v4(), Uuid::new_v4());

    c.bench_function("validate_book", |b| {
        b.iter(|| {
            let _ = black_box(&book).validate();
        })
    });

    c.bench_function("validate_user_email", |b| {
        b.iter(|| {
            let _ = black_box(&user).validate();
        })
    });

    c.bench_function("validate_loan_references", |b| {
        b.iter(|| {
            let _ = black_box(&loan).validate();
        })
    });
}

criterion_group!(benches, bench_validation);
criterion_main!(benches);
