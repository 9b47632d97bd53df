//! Exercises the library end to end: two hosts behind a router, one ARP
//! exchange, one forwarded datagram. Not part of the crate's contract.

use netbridge::config::{InterfaceConfig, RouteSpec, RouterConfig};
use netbridge::proto::{Address, ArpMessage, EthFrame, InternetDatagram, Ipv4Header, MacAddr, TYPE_ARP};
use netbridge::router::Router;

fn main() {
    tracing_subscriber::fmt::init();

    let router_mac0 = [0x02, 0, 0, 0, 0, 0x01];
    let router_mac1 = [0x02, 0, 0, 0, 0, 0x02];
    let router_ip0 = Address::new(10, 0, 0, 1);
    let router_ip1 = Address::new(10, 1, 0, 1);
    let host_mac = MacAddr([0x02, 0, 0, 0, 0, 0xAA]);
    let host_ip = Address::new(10, 1, 0, 42);

    let config = RouterConfig {
        interfaces: vec![
            InterfaceConfig { mac: router_mac0, ip: router_ip0 },
            InterfaceConfig { mac: router_mac1, ip: router_ip1 },
        ],
        routes: vec![
            RouteSpec { route_prefix: Address::new(10, 0, 0, 0), prefix_length: 8, next_hop: None, interface_num: 0 },
            RouteSpec { route_prefix: Address::new(10, 1, 0, 0), prefix_length: 16, next_hop: None, interface_num: 1 },
        ],
    };
    let mut router = Router::from_config(config).expect("demo config is well-formed");

    let mut header = Ipv4Header {
        ihl: 5,
        dscp_ecn: 0,
        total_length: 20,
        identification: 1,
        flags_fragment_offset: 0,
        ttl: 64,
        protocol: 0,
        checksum: 0,
        src: Address::new(10, 0, 0, 50),
        dst: host_ip,
        options: Vec::new(),
    };
    header.recompute_checksum();
    let dgram = InternetDatagram { header, payload: vec![0xDE, 0xAD, 0xBE, 0xEF] };

    let in_frame = EthFrame::new(MacAddr([0; 6]), MacAddr(router_mac0), netbridge::proto::TYPE_IPV4, dgram.serialize());
    router.deliver_frame(0, in_frame);
    router.route();

    let arp_request = router.interface_mut(1).unwrap().maybe_send().expect("router arps for the host");
    assert_eq!(arp_request.ethertype, TYPE_ARP);
    println!("router emitted ARP request on interface 1");

    let request = ArpMessage::parse(&arp_request.payload).unwrap();
    let reply = ArpMessage::reply(host_mac, host_ip, MacAddr(router_mac1), router_ip1);
    let reply_frame = EthFrame::new(host_mac, MacAddr(router_mac1), TYPE_ARP, reply.serialize());
    let _ = request;
    router.deliver_frame(1, reply_frame);

    let forwarded = router.interface_mut(1).unwrap().maybe_send().expect("datagram flushed after arp resolves");
    let forwarded_dgram = InternetDatagram::parse(&forwarded.payload).unwrap();
    println!(
        "forwarded datagram to {} with ttl {} (was 64)",
        forwarded_dgram.header.dst, forwarded_dgram.header.ttl
    );
}
