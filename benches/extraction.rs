use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hh_level::artifacts::ArtifactStore;
use hh_level::config::PipelineConfig;
use hh_level::extractor::FeatureExtractor;
use hh_level::level::LevelClassifier;
use hh_level::loader::parse_table;
use hh_level::parsers::FieldParsers;
use hh_level::transform::tfidf::TfidfVectorizer;

fn make_documents(n: usize) -> Vec<String> {
    let titles = [
        "junior python developer",
        "backend engineer разработчик",
        "senior java developer",
        "ведущий инженер devops",
        "frontend разработчик javascript",
    ];
    let cities = ["москва", "санкт-петербург", "казань", "новосибирск"];
    (0..n)
        .map(|i| format!("{} {}", titles[i % titles.len()], cities[i % cities.len()]))
        .collect()
}

fn make_table_text(n: usize) -> String {
    let mut lines = vec![
        "\"Пол, возраст\",ЗП,Ищет работу на должность:,Город,Опыт,Последеняя/нынешняя должность"
            .to_string(),
    ];
    for (i, doc) in make_documents(n).iter().enumerate() {
        lines.push(format!(
            "\"Мужчина , {} лет\",{} руб.,{doc},Москва,Опыт работы {} года {} месяца,Разработчик",
            20 + i % 30,
            50_000 + i * 100,
            i % 10,
            i % 12
        ));
    }
    lines.join("\n")
}

fn bench_extraction(c: &mut Criterion) {
    let config = PipelineConfig::default();
    let parsers = FieldParsers::new(&config);
    let classifier = LevelClassifier::new(&config);
    let docs = make_documents(1_000);

    c.bench_function("parse fields x1", |bch| {
        bch.iter(|| {
            (
                parsers.age(black_box(Some("Мужчина , 30 лет , родился 1 января 1994"))),
                parsers.experience_months(black_box(Some("Опыт работы 6 лет 2 месяца"))),
                parsers.salary(black_box(Some("3000 USD"))),
            )
        })
    });

    c.bench_function("classify level x1000", |bch| {
        bch.iter(|| {
            docs.iter()
                .map(|d| classifier.classify(black_box(Some(30.0)), d))
                .count()
        })
    });

    c.bench_function("tfidf fit n=1000", |bch| {
        bch.iter(|| TfidfVectorizer::fit(black_box(&docs), 500))
    });

    let vectorizer = TfidfVectorizer::fit(&docs, 500).expect("fit vectorizer");
    c.bench_function("tfidf transform n=1000", |bch| {
        bch.iter(|| vectorizer.transform(black_box(&docs)))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let config = PipelineConfig::default();
    let table = parse_table(&make_table_text(1_000)).expect("parse synthetic table");
    let tmp = tempfile::tempdir().expect("tempdir");
    let extractor = FeatureExtractor::for_training(&config, ArtifactStore::new(tmp.path()));

    c.bench_function("extract features n=1000", |bch| {
        bch.iter(|| extractor.extract(black_box(&table)))
    });
}

criterion_group!(benches, bench_extraction, bench_pipeline);
criterion_main!(benches);
