fn main() {
    vet_clinic_api::main();
}
