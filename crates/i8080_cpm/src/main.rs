use i8080_cpm::{parse_offset, CpmMachine, TPA_START};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(image_path) = args.next() else {
        eprintln!(
            "Usage: i8080_cpm <image> [offset]\n\
             Loads a CP/M program at offset (default 0x0100) and runs it until it halts.\n\
             Example: i8080_cpm assets/roms/8080_tests/TST8080.COM"
        );
        std::process::exit(2);
    };

    let offset = match args.next() {
        Some(text) => match parse_offset(&text) {
            Ok(offset) => offset,
            Err(err) => {
                eprintln!("Error: {:#}", err);
                std::process::exit(2);
            }
        },
        None => TPA_START,
    };

    log::info!("Running '{}' at 0x{:04X}", image_path, offset);

    let result = CpmMachine::from_file(&image_path, offset).and_then(|mut machine| {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        machine.run(&mut out)
    });

    match result {
        Ok(summary) => {
            println!();
            log::info!("{} instructions executed", summary.steps);
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    }
}
