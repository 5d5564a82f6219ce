use std::error::Error;

use gridcode::{DataMatrixBuilder, ECLevel, QRBuilder, QRReader};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "Hello, world! 🌏";

    let qr = QRBuilder::new(data.as_bytes()).version(3).ec_level(ECLevel::H).build()?;
    println!("{}", qr.to_str(1));
    println!("{}", qr.metadata());

    let decoded = QRReader::read(&qr.to_bit_matrix())?;
    println!("Decoded: {}\n", decoded.text);

    let dm = DataMatrixBuilder::new(b"gridcode").build()?;
    println!("{}", dm.to_str(1));

    Ok(())
}
