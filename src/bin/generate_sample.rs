use rust_xlsxwriter::Workbook;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in [lo, hi).
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let brands = ["Acme", "Boltworks", "Corefil", "Dynamo", "Extrudo"];
    let colors = ["Black", "White", "Red", "Blue", "Natural"];

    // Per-material measurement baselines: (tensile kg, layer kg, izod J/m, $/kg)
    let materials: [(&str, f64, f64, f64, f64); 4] = [
        ("PLA", 48.0, 40.0, 25.0, 20.0),
        ("PETG", 52.0, 46.0, 55.0, 24.0),
        ("ABS", 40.0, 32.0, 110.0, 22.0),
        ("ASA", 44.0, 35.0, 95.0, 28.0),
    ];

    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name("Filament data").expect("sheet name");

    ws.write_string(0, 0, "Filament measurement export (do not edit)")
        .expect("title row");

    let headers = [
        "Brand",
        "Filament type",
        "Color",
        "YouTube Link",
        "Tensile strength (kg)",
        "Layer adhesion (kg)",
        "Izod impact (J/m)",
        "Price ($/kg)",
    ];
    for (c, h) in headers.iter().enumerate() {
        ws.write_string(1, c as u16, *h).expect("header cell");
    }

    let mut row: u32 = 2;
    for (brand_no, brand) in brands.iter().enumerate() {
        for (mat, tensile, layer, izod, price) in &materials {
            let color = colors[(brand_no + row as usize) % colors.len()];

            ws.write_string(row, 0, *brand).unwrap();
            ws.write_string(row, 1, *mat).unwrap();
            ws.write_string(row, 2, color).unwrap();
            ws.write_string(row, 3, format!("https://youtu.be/{brand}{row}"))
                .unwrap();
            ws.write_number(row, 4, tensile * rng.range(0.85, 1.15)).unwrap();
            ws.write_number(row, 5, layer * rng.range(0.8, 1.2)).unwrap();
            ws.write_number(row, 6, izod * rng.range(0.7, 1.3)).unwrap();
            ws.write_number(row, 7, price * rng.range(0.9, 1.25)).unwrap();
            row += 1;
        }
    }

    // Stray content a real export accumulates: the pipeline must drop these.
    ws.write_string(row, 0, "NEW ROWS are added below by the team").unwrap();
    ws.write_string(row, 1, "see wiki").unwrap();
    row += 1;
    ws.write_string(row, 0, "Nameless").unwrap();
    ws.write_string(row, 1, "undefined").unwrap();
    ws.write_number(row, 4, 12.0).unwrap();
    row += 1;

    let output_path = "sample_data.xlsx";
    workbook.save(output_path).expect("writing workbook");

    println!("Wrote {} data rows to {output_path}", row - 2);
}
