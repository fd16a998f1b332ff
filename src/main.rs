fn main() {
    employee_digest_lib::run()
}
