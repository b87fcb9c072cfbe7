//! Synthetic resume exports shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "\"Пол, возраст\",ЗП,Ищет работу на должность:,\"Город, переезд, командировки\",Занятость,Опыт (двойное нажатие для полной версии),Последенее/нынешнее место работы,Последеняя/нынешняя должность";

pub fn row(gender_age: &str, salary: &str, position: &str, city: &str, experience: &str, last: &str) -> String {
    format!(
        "\"{gender_age}\",{salary},{position},\"{city}\",полная занятость,\"{experience}\",ООО Ромашка,{last}"
    )
}

/// Three IT rows and two non-IT rows.
pub fn five_row_csv() -> String {
    [
        HEADER.to_string(),
        row("Мужчина , 30 лет", "150000 руб.", "Python Developer", "Москва , готов к переезду", "Опыт работы 4 года 1 месяц", "Программист"),
        row("Женщина , 22 года", "60000 руб.", "Junior QA", "Казань", "Опыт работы 5 месяцев", "Стажер"),
        row("Мужчина , 45 лет", "3000 USD", "Backend Engineer", "Минск , не готов к переезду", "Опыт работы 2 года", "Инженер"),
        row("Женщина , 35 лет", "40000 руб.", "Продавец-консультант", "Москва", "Опыт работы 10 лет", "Кассир"),
        row("Мужчина , 50 лет", "90000 руб.", "Бухгалтер", "Самара", "Опыт работы 20 лет", "Главбух"),
    ]
    .join("\n")
}

/// Enough labelled rows of each level for a stratified split, plus noise rows.
pub fn training_csv() -> String {
    let mut lines = vec![HEADER.to_string()];
    let cities = ["Москва", "Санкт-Петербург", "Казань", "Новосибирск"];
    for i in 0..30 {
        let gender = if i % 2 == 0 { "Мужчина" } else { "Женщина" };
        let age = 21 + i % 20;
        let city = cities[i % cities.len()];
        let (position, experience, salary) = match i % 3 {
            0 => ("Junior Python Developer", "Опыт работы 8 месяцев".to_string(), 50000 + i * 1000),
            1 => ("Backend Engineer", format!("Опыт работы 2 года {} месяца", i % 4 + 1), 120000 + i * 1000),
            _ => ("Senior Java Developer", format!("Опыт работы {} лет", 5 + i % 5), 250000 + i * 1000),
        };
        lines.push(row(
            &format!("{gender} , {age} лет"),
            &format!("{salary} руб."),
            position,
            city,
            &experience,
            "Разработчик",
        ));
    }
    for i in 0..5 {
        lines.push(row(
            "Женщина , 40 лет",
            &format!("{} руб.", 30000 + i * 500),
            "Продавец-консультант",
            "Москва",
            "Опыт работы 3 года",
            "Кассир",
        ));
    }
    lines.join("\n")
}

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture csv");
    path
}
