use shamir_vote::{reconstruct, render_lines, Share};

fn main() {
    // f(x) = 2x + 1 with the share at x = 4 corrupted.
    let points = [(1, 3), (2, 5), (3, 7), (4, 100), (5, 11)];
    let shares = match points
        .iter()
        .map(|&(x, y)| Share::from_i64(x, y))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(shares) => shares,
        Err(err) => {
            eprintln!("invalid share: {err}");
            std::process::exit(1);
        }
    };
    match reconstruct(&shares, 2) {
        Ok(result) => {
            for line in render_lines("demo", &result) {
                println!("{line}");
            }
        }
        Err(err) => {
            eprintln!("reconstruction failed: {err}");
            std::process::exit(1);
        }
    }
}
