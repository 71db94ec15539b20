//! Built-in reference data. Order matters: fuzzy matching returns the
//! first entry that matches.

/// label, kcal, carbs g, protein g, fat g, serving unit
pub(super) const NUTRITION: &[(&str, f64, f64, f64, f64, &str)] = &[
    // western mains
    ("pizza", 266.0, 33.0, 11.0, 10.0, "per slice"),
    ("hamburger", 295.0, 25.0, 17.0, 14.0, "per burger"),
    ("sandwich", 320.0, 42.0, 13.0, 11.0, "each"),
    ("hot dog", 290.0, 24.0, 10.0, 17.0, "each"),
    ("burrito", 450.0, 50.0, 20.0, 18.0, "each"),
    ("taco", 170.0, 13.0, 9.0, 10.0, "each"),
    ("pasta", 350.0, 65.0, 12.0, 5.0, "per bowl"),
    ("spaghetti", 380.0, 70.0, 14.0, 6.0, "per bowl"),
    // asian
    ("rice", 206.0, 45.0, 4.0, 0.4, "per bowl"),
    ("fried rice", 350.0, 52.0, 8.0, 13.0, "per bowl"),
    ("noodles", 300.0, 56.0, 10.0, 4.0, "per bowl"),
    ("ramen", 436.0, 63.0, 17.0, 12.0, "per bowl"),
    ("sushi", 350.0, 60.0, 15.0, 8.0, "per serving"),
    ("dumpling", 40.0, 4.0, 2.0, 2.0, "each"),
    // breakfast
    ("pancake", 227.0, 28.0, 6.0, 9.0, "each"),
    ("waffle", 218.0, 25.0, 6.0, 11.0, "each"),
    ("toast", 80.0, 15.0, 3.0, 1.0, "per slice"),
    ("egg", 72.0, 0.4, 6.0, 5.0, "each"),
    ("bacon", 43.0, 0.0, 3.0, 3.0, "per strip"),
    ("oatmeal", 150.0, 27.0, 5.0, 3.0, "per bowl"),
    // meat
    ("chicken", 165.0, 0.0, 31.0, 3.6, "per 100g"),
    ("steak", 271.0, 0.0, 25.0, 19.0, "per 100g"),
    ("pork", 242.0, 0.0, 27.0, 14.0, "per 100g"),
    ("fish", 206.0, 0.0, 22.0, 12.0, "per 100g"),
    ("fried chicken", 320.0, 12.0, 20.0, 21.0, "per piece"),
    // vegetables, salads
    ("salad", 50.0, 10.0, 2.0, 0.5, "per bowl"),
    ("vegetable", 50.0, 10.0, 2.0, 0.3, "per serving"),
    ("soup", 120.0, 15.0, 6.0, 4.0, "per bowl"),
    // fast food
    ("french fries", 312.0, 41.0, 4.0, 15.0, "per serving"),
    ("onion ring", 276.0, 31.0, 4.0, 16.0, "per serving"),
    // desserts, drinks
    ("cake", 257.0, 38.0, 3.0, 11.0, "per slice"),
    ("ice cream", 207.0, 24.0, 4.0, 11.0, "per scoop"),
    ("cookie", 49.0, 7.0, 0.5, 2.0, "each"),
    ("donut", 269.0, 31.0, 4.0, 15.0, "each"),
    ("coffee", 2.0, 0.0, 0.0, 0.0, "per cup"),
];

pub(super) const UNKNOWN: (&str, f64, f64, f64, f64, &str) =
    ("unknown", 250.0, 30.0, 10.0, 10.0, "estimated");

pub(super) const TRANSLATIONS: &[(&str, &str)] = &[
    ("pizza", "披薩"),
    ("hamburger", "漢堡"),
    ("sandwich", "三明治"),
    ("hot dog", "熱狗"),
    ("burrito", "墨西哥捲餅"),
    ("taco", "墨西哥玉米餅"),
    ("pasta", "義大利麵"),
    ("spaghetti", "義大利麵"),
    ("rice", "米飯"),
    ("fried rice", "炒飯"),
    ("noodles", "麵條"),
    ("ramen", "拉麵"),
    ("sushi", "壽司"),
    ("dumpling", "餃子"),
    ("pancake", "鬆餅"),
    ("waffle", "格子鬆餅"),
    ("toast", "吐司"),
    ("egg", "雞蛋"),
    ("bacon", "培根"),
    ("oatmeal", "燕麥"),
    ("chicken", "雞肉"),
    ("steak", "牛排"),
    ("pork", "豬肉"),
    ("fish", "魚"),
    ("fried chicken", "炸雞"),
    ("salad", "沙拉"),
    ("vegetable", "蔬菜"),
    ("soup", "湯"),
    ("french fries", "薯條"),
    ("onion ring", "洋蔥圈"),
    ("cake", "蛋糕"),
    ("ice cream", "冰淇淋"),
    ("cookie", "餅乾"),
    ("donut", "甜甜圈"),
    ("doughnut", "甜甜圈"),
    ("coffee", "咖啡"),
];
