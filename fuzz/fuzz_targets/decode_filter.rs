use honggfuzz::fuzz;
use loadform::{decode_loads, parse_load_points};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Some((&n, rest)) = data.split_first() else {
                return;
            };
            let Ok(filter) = std::str::from_utf8(rest) else {
                return;
            };
            let values = ["a", "b", "c", "d"];
            let mut slots = vec![String::new(); n as usize % 32];
            decode_loads(&values, Some(filter), &mut slots);
            let _ = parse_load_points(filter, n as usize);
        });
    }
}
